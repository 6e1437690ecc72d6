#![deny(missing_docs)]

//! # Annotation Values
//!
//! Declarative metadata attached to methods, parameters, fields and accessors.
//!
//! Values are wrapped in [`AnnotationRef`], which carries a stable identity so
//! that the same declaration discovered through several accessors is only
//! processed once, while two independently declared but equal values are kept.

use crate::model::parameter::{ParameterIn, ParameterStyle};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use utoipa::openapi::{RefOr, Schema};

/// All annotation kinds understood by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Annotation {
    /// Explicit parameter declaration.
    Parameter(ParameterAnnotation),
    /// Method-level request body declaration.
    RequestBody(RequestBodyAnnotation),
    /// Method-level response declaration.
    ApiResponse(ResponseAnnotation),
    /// Verb mapping (`GET`, `PUT`, ...) with its path fragments.
    Mapping(MappingAnnotation),
    /// Verb-less path mapping, used on classes and methods.
    RequestMapping(RequestMappingAnnotation),
    /// Marks a compound member whose properties become parameters.
    BeanParam,
    /// Marks a framework-injected member excluded from extraction.
    Context,
    /// Marks a constructor as injectable.
    Inject,
    /// Any other annotation, kept as an opaque name.
    Marker {
        /// Annotation name.
        name: String,
    },
}

impl Annotation {
    /// Returns the parameter declaration if this is one.
    pub fn as_parameter(&self) -> Option<&ParameterAnnotation> {
        match self {
            Annotation::Parameter(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the request body declaration if this is one.
    pub fn as_request_body(&self) -> Option<&RequestBodyAnnotation> {
        match self {
            Annotation::RequestBody(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the response declaration if this is one.
    pub fn as_response(&self) -> Option<&ResponseAnnotation> {
        match self {
            Annotation::ApiResponse(r) => Some(r),
            _ => None,
        }
    }

    /// Creates an opaque marker annotation.
    pub fn marker(name: impl Into<String>) -> Self {
        Annotation::Marker { name: name.into() }
    }
}

/// `@Parameter`-style declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParameterAnnotation {
    /// Parameter name.
    pub name: Option<String>,
    /// Explicit location.
    #[serde(rename = "in")]
    pub location: Option<ParameterIn>,
    /// Description.
    pub description: Option<String>,
    /// Required flag.
    pub required: bool,
    /// Deprecated flag.
    pub deprecated: bool,
    /// Excludes the member from documentation.
    pub hidden: bool,
    /// Reference to a reusable parameter.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Example value (JSON text or plain string).
    pub example: Option<String>,
    /// Serialization style.
    pub style: Option<ParameterStyle>,
    /// Explode modifier.
    pub explode: Option<bool>,
    /// Allow reserved characters.
    pub allow_reserved: bool,
    /// Explicit schema.
    pub schema: Option<RefOr<Schema>>,
}

/// `@RequestBody`-style declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestBodyAnnotation {
    /// Reference to a reusable request body.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Required flag.
    pub required: bool,
    /// Specification extensions.
    pub extensions: Vec<ExtensionAnnotation>,
    /// Content declarations.
    pub content: Vec<ContentAnnotation>,
}

/// `@ApiResponse`-style declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseAnnotation {
    /// Status code, or none for the default response.
    pub response_code: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Reference to a reusable response.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// Specification extensions.
    pub extensions: Vec<ExtensionAnnotation>,
    /// Content declarations.
    pub content: Vec<ContentAnnotation>,
    /// Header declarations.
    pub headers: Vec<HeaderAnnotation>,
    /// Link declarations.
    pub links: Vec<LinkAnnotation>,
}

/// One media type entry of a body or response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentAnnotation {
    /// Media type; the configured default applies when blank.
    pub media_type: Option<String>,
    /// Payload schema.
    pub schema: Option<RefOr<Schema>>,
    /// Example payload (JSON text or plain string).
    pub example: Option<String>,
}

/// Response header declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderAnnotation {
    /// Header name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Header value schema.
    pub schema: Option<RefOr<Schema>>,
}

/// Response link declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkAnnotation {
    /// Link name.
    pub name: String,
    /// Target operation reference.
    pub operation_ref: Option<String>,
    /// Target operation id.
    pub operation_id: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Parameters passed to the target operation.
    pub parameters: Vec<LinkParameterAnnotation>,
}

/// One `name = expression` pair of a link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkParameterAnnotation {
    /// Parameter name of the target operation.
    pub name: String,
    /// Runtime expression, e.g. `$request.path.id`.
    pub expression: String,
}

/// Specification extension declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionAnnotation {
    /// Extension name; blank spreads the properties as top-level keys.
    pub name: String,
    /// Properties of the extension.
    pub properties: Vec<ExtensionProperty>,
}

/// One property of an extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionProperty {
    /// Property name.
    pub name: String,
    /// Property value.
    pub value: String,
    /// Parse the value as JSON instead of keeping a string.
    pub parse_value: bool,
}

/// Verbs that have a dedicated mapping annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MappingVerb {
    /// `@GetMapping`
    Get,
    /// `@PutMapping`
    Put,
    /// `@PostMapping`
    Post,
    /// `@DeleteMapping`
    Delete,
    /// `@PatchMapping`
    Patch,
}

/// Verb mapping with its path fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingAnnotation {
    /// Mapped verb.
    pub verb: MappingVerb,
    /// Path fragments; only the first one is used.
    #[serde(default)]
    pub paths: Vec<String>,
}

impl MappingAnnotation {
    /// Creates a mapping with a single path fragment.
    pub fn new(verb: MappingVerb, path: impl Into<String>) -> Self {
        Self {
            verb,
            paths: vec![path.into()],
        }
    }
}

/// Verb-less path mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestMappingAnnotation {
    /// Path fragments; only the first one is used.
    pub paths: Vec<String>,
}

impl RequestMappingAnnotation {
    /// Creates a mapping with a single path fragment.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            paths: vec![path.into()],
        }
    }

    /// The fragment that participates in path building.
    pub fn first_path(&self) -> Option<&str> {
        self.paths.first().map(String::as_str)
    }
}

macro_rules! impl_into_annotation {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Annotation {
                fn from(value: $ty) -> Self {
                    Annotation::$variant(value)
                }
            }
        )*
    };
}

impl_into_annotation! {
    ParameterAnnotation => Parameter,
    RequestBodyAnnotation => RequestBody,
    ResponseAnnotation => ApiResponse,
    MappingAnnotation => Mapping,
    RequestMappingAnnotation => RequestMapping,
}

/// Process-unique identity of a declared annotation instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(u64);

static NEXT_ANNOTATION_ID: AtomicU64 = AtomicU64::new(1);

/// Shared annotation value with identity semantics.
///
/// Clones share the same [`AnnotationId`]; equality and hashing only look at
/// the id, never at the value.
#[derive(Clone)]
pub struct AnnotationRef {
    id: AnnotationId,
    value: Arc<Annotation>,
}

impl AnnotationRef {
    /// Wraps a freshly declared annotation, assigning it a new identity.
    pub fn new(annotation: impl Into<Annotation>) -> Self {
        Self {
            id: AnnotationId(NEXT_ANNOTATION_ID.fetch_add(1, Ordering::Relaxed)),
            value: Arc::new(annotation.into()),
        }
    }

    /// Identity of this instance.
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    /// The wrapped value.
    pub fn value(&self) -> &Annotation {
        &self.value
    }
}

impl Deref for AnnotationRef {
    type Target = Annotation;

    fn deref(&self) -> &Annotation {
        &self.value
    }
}

impl PartialEq for AnnotationRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AnnotationRef {}

impl Hash for AnnotationRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for AnnotationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnnotationRef#{}({:?})", self.id.0, self.value)
    }
}

impl From<Annotation> for AnnotationRef {
    fn from(value: Annotation) -> Self {
        AnnotationRef::new(value)
    }
}

impl Serialize for AnnotationRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.as_ref().serialize(serializer)
    }
}

// Every decoded annotation gets a fresh identity.
impl<'de> Deserialize<'de> for AnnotationRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Annotation::deserialize(deserializer).map(AnnotationRef::new)
    }
}

/// Returns the trimmed-non-empty content of an optional string.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
