#![deny(missing_docs)]

//! # OAS Reader Core
//!
//! Annotation-driven extraction of OpenAPI operations.
//!
//! Given descriptors of handler methods, their parameters and the compound
//! types they use, the crate resolves paths and verbs, classifies parameters
//! through a chain of extensions, and assembles request bodies and responses
//! as `utoipa` model values.

/// Shared error types.
pub mod error;

/// Reader configuration.
pub mod config;

/// Annotation, type and operation descriptors.
pub mod model;

/// Shared component registry.
pub mod components;

/// `$ref` normalisation.
pub mod refs;

/// Chain-of-responsibility extensions.
pub mod extension;

/// Secondary annotation pass.
pub mod processor;

/// Compound type introspection.
pub mod introspect;

/// Path and verb resolution.
pub mod routes;

/// Request body and response assembly.
pub mod assembler;

/// Per-operation orchestration.
pub mod reader;

pub use assembler::{get_api_responses, get_request_body};
pub use components::ComponentRegistry;
pub use config::ReaderConfig;
pub use error::{AppError, AppResult};
pub use extension::{
    DefaultParameterExtension, Extension, ExtensionChain, ExtensionRegistry, ExtractionRequest,
    ScanContext, TypeExclusionSet, ViewToken,
};
pub use introspect::{
    collect_constructor_parameters, collect_field_parameters, introspect_bean, Introspection,
};
pub use model::{
    Annotation, AnnotationRef, HttpMethod, MethodDescriptor, OperationFragment, Parameter,
    ParameterIn, ResolvedParameter, TypeCatalog, TypeDescriptor, TypeName,
};
pub use processor::apply_annotations;
pub use reader::{OperationReader, OperationSite, ReadOperation};
pub use routes::{append_path_component, extract_operation_method, get_path, is_ignored};
