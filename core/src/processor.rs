#![deny(missing_docs)]

//! # Parameter Processor
//!
//! The secondary annotation pass. Once a member has been placed (path, query,
//! header, cookie, form or body), its `Parameter` annotations are layered onto
//! the produced parameter. The pass fills in descriptive fields and the schema
//! but never touches the location.

use crate::extension::request::ScanContext;
use crate::model::annotations::{non_blank, AnnotationRef};
use crate::model::parameter::Parameter;
use crate::model::types::TypeName;
use serde_json::Value as JsonValue;
use utoipa::openapi::{Ref, RefOr, Schema};

/// Layers every `Parameter` annotation, in order, onto `parameter`.
///
/// Returns `None` when an annotation hides the member. `$ref` parameters are
/// returned untouched.
pub fn apply_annotations(
    parameter: Parameter,
    ty: &TypeName,
    annotations: &[AnnotationRef],
    context: ScanContext<'_>,
) -> Option<Parameter> {
    let mut parameter = layer_annotations(parameter, annotations)?;
    if parameter.schema.is_none() && !parameter.is_reference() {
        parameter.schema = type_schema(ty, context);
    }
    Some(parameter)
}

/// Layers the annotations without falling back to a type schema.
///
/// Used when an enclosing member's annotations are applied to parameters
/// that already went through [`apply_annotations`] for their own type.
pub(crate) fn layer_annotations(
    mut parameter: Parameter,
    annotations: &[AnnotationRef],
) -> Option<Parameter> {
    let declared: Vec<_> = annotations.iter().filter_map(|a| a.as_parameter()).collect();

    if declared.iter().any(|p| p.hidden) {
        return None;
    }
    if parameter.is_reference() {
        return Some(parameter);
    }

    for p in declared {
        if let Some(name) = non_blank(&p.name) {
            parameter.name = Some(name.to_string());
        }
        if let Some(description) = non_blank(&p.description) {
            parameter.description = Some(description.to_string());
        }
        if p.required {
            parameter.required = Some(true);
        }
        if p.deprecated {
            parameter.deprecated = Some(true);
        }
        if let Some(example) = non_blank(&p.example) {
            parameter.example = Some(parse_example(example));
        }
        if p.style.is_some() {
            parameter.style = p.style;
        }
        if p.explode.is_some() {
            parameter.explode = p.explode;
        }
        if p.allow_reserved {
            parameter.allow_reserved = Some(true);
        }
        if let Some(schema) = &p.schema {
            parameter.schema = Some(schema.clone());
        }
    }

    Some(parameter)
}

/// Schema of a described type.
///
/// Component types are registered in the shared registry and referenced.
pub(crate) fn type_schema(ty: &TypeName, context: ScanContext<'_>) -> Option<RefOr<Schema>> {
    let descriptor = context.catalog.get(ty)?;
    let schema = descriptor.schema.clone()?;
    if !descriptor.component {
        return Some(schema);
    }
    let reference = context
        .components
        .register_schema(ty.simple_name(), schema);
    Some(RefOr::Ref(Ref::new(reference)))
}

/// Parses an example as JSON, keeping it as a string when it is not valid JSON.
pub(crate) fn parse_example(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}
