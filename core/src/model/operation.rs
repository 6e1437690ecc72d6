#![deny(missing_docs)]

//! # Operation Models
//!
//! Descriptions of scanned methods and classes, and the fragment assembled for
//! each documented operation.

use crate::model::annotations::{
    Annotation, AnnotationRef, MappingAnnotation, RequestBodyAnnotation, RequestMappingAnnotation,
    ResponseAnnotation,
};
use crate::model::types::AnnotatedMember;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::openapi::request_body::RequestBody;
use utoipa::openapi::{RefOr, Responses};

/// HTTP verbs an operation can be documented under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// `get`
    Get,
    /// `post`
    Post,
    /// `put`
    Put,
    /// `delete`
    Delete,
    /// `patch`
    Patch,
    /// `head`
    Head,
    /// `options`
    Options,
}

impl HttpMethod {
    /// Lowercase verb, as used for path item keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scanned handler method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Method-level annotations.
    pub annotations: Vec<AnnotationRef>,
    /// Parameters in declaration order.
    pub parameters: Vec<AnnotatedMember>,
}

impl MethodDescriptor {
    /// Creates a method with no annotations or parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds an annotation.
    pub fn annotated(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotations.push(AnnotationRef::new(annotation));
        self
    }

    /// Adds a parameter.
    pub fn with_parameter(mut self, parameter: AnnotatedMember) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Verb mappings in declaration order.
    pub fn mappings(&self) -> impl Iterator<Item = &MappingAnnotation> {
        self.annotations.iter().filter_map(|a| match a.value() {
            Annotation::Mapping(m) => Some(m),
            _ => None,
        })
    }

    /// The first verb-less path mapping.
    pub fn request_mapping(&self) -> Option<&RequestMappingAnnotation> {
        self.annotations.iter().find_map(|a| match a.value() {
            Annotation::RequestMapping(m) => Some(m),
            _ => None,
        })
    }

    /// The first request body declaration.
    pub fn request_body(&self) -> Option<&RequestBodyAnnotation> {
        self.annotations.iter().find_map(|a| a.as_request_body())
    }

    /// All response declarations, in declaration order.
    pub fn responses(&self) -> Vec<&ResponseAnnotation> {
        self.annotations
            .iter()
            .filter_map(|a| a.as_response())
            .collect()
    }
}

/// A scanned class (resource), read through `OperationReader::read_class`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassDescriptor {
    /// Class name.
    pub name: String,
    /// Class-level path mapping.
    pub request_mapping: Option<RequestMappingAnnotation>,
    /// Handler methods.
    pub methods: Vec<MethodDescriptor>,
}

/// The normalized result for one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationFragment {
    /// Normalized path; absent when no path input existed.
    pub path: Option<String>,
    /// HTTP verb; absent when no handler could resolve it.
    pub method: Option<HttpMethod>,
    /// Request body, absent when nothing was declared.
    pub request_body: Option<RefOr<RequestBody>>,
    /// Responses, absent when no entry survived.
    pub responses: Option<Responses>,
}
