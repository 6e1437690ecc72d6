#![deny(missing_docs)]

//! # Model Module
//!
//! Data the engine consumes (annotations, type and method descriptors) and the
//! shapes it produces (parameters, operation fragments).

pub mod annotations;
pub mod operation;
pub mod parameter;
pub mod types;

pub use annotations::{
    Annotation, AnnotationId, AnnotationRef, ContentAnnotation, ExtensionAnnotation,
    ExtensionProperty, HeaderAnnotation, LinkAnnotation, LinkParameterAnnotation,
    MappingAnnotation, MappingVerb, ParameterAnnotation, RequestBodyAnnotation,
    RequestMappingAnnotation, ResponseAnnotation,
};
pub use operation::{ClassDescriptor, HttpMethod, MethodDescriptor, OperationFragment};
pub use parameter::{Parameter, ParameterIn, ParameterStyle, ResolvedParameter};
pub use types::{
    Accessor, AnnotatedMember, ConstructorDescriptor, Nesting, PropertyDescriptor, TypeCatalog,
    TypeDescriptor, TypeName, Visibility,
};
