#![deny(missing_docs)]

//! # Parameter Models
//!
//! The parameter shape produced by extraction and the bag that carries the
//! result of one chain resolution.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use utoipa::openapi::{RefOr, Schema};

/// Location of a parameter.
///
/// `Form` only exists during classification; form parameters leave the engine
/// with no location at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterIn {
    /// Path segment.
    Path,
    /// Query string.
    Query,
    /// Request header.
    Header,
    /// Cookie.
    Cookie,
    /// Form field of the request body.
    Form,
}

impl ParameterIn {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterIn::Path => "path",
            ParameterIn::Query => "query",
            ParameterIn::Header => "header",
            ParameterIn::Cookie => "cookie",
            ParameterIn::Form => "form",
        }
    }
}

impl fmt::Display for ParameterIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter serialization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterStyle {
    /// `matrix`
    Matrix,
    /// `label`
    Label,
    /// `form`
    Form,
    /// `simple`
    Simple,
    /// `spaceDelimited`
    SpaceDelimited,
    /// `pipeDelimited`
    PipeDelimited,
    /// `deepObject`
    DeepObject,
}

/// A documented operation input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Reference to a reusable parameter; when set nothing else is meaningful.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Location.
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<ParameterIn>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Deprecated flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    /// Value schema.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<RefOr<Schema>>,
    /// Example value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<JsonValue>,
    /// Serialization style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ParameterStyle>,
    /// Explode modifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
    /// Allow reserved characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_reserved: Option<bool>,
}

impl Parameter {
    /// A parameter that only points at a reusable definition.
    pub fn reference(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            ..Default::default()
        }
    }

    /// Returns true for `$ref`-only parameters.
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }
}

/// Result of one chain resolution.
///
/// A single annotation resolution yields classified/form parameters or one
/// body candidate; the bag only mixes them when nested results are merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedParameter {
    /// Path, query, header and cookie parameters.
    pub parameters: Vec<Parameter>,
    /// Form fields, always without a location.
    pub form_parameters: Vec<Parameter>,
    /// Inferred request body candidate.
    pub request_body: Option<Parameter>,
}

impl ResolvedParameter {
    /// An empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.form_parameters.is_empty() && self.request_body.is_none()
    }

    /// Appends another bag. An existing body candidate is kept over a later one.
    pub fn merge(&mut self, other: ResolvedParameter) {
        self.parameters.extend(other.parameters);
        self.form_parameters.extend(other.form_parameters);
        if self.request_body.is_none() {
            self.request_body = other.request_body;
        }
    }
}
