#![deny(missing_docs)]

//! # Request Body Assembly

use crate::assembler::content::{get_content, get_extensions};
use crate::config::ReaderConfig;
use crate::model::annotations::{non_blank, RequestBodyAnnotation};
use crate::refs::{component_ref, ComponentSection};
use utoipa::openapi::request_body::{RequestBody, RequestBodyBuilder};
use utoipa::openapi::{Ref, RefOr, Required};

/// Builds the request body of an operation.
///
/// A `$ref` short-circuits every other field. Otherwise the body only exists
/// if a description, the required flag, an extension or content is declared;
/// a fully default declaration yields `None`.
pub fn get_request_body(
    annotation: Option<&RequestBodyAnnotation>,
    config: &ReaderConfig,
) -> Option<RefOr<RequestBody>> {
    let annotation = annotation?;

    if let Some(reference) = non_blank(&annotation.reference) {
        let reference = component_ref(ComponentSection::RequestBodies, reference);
        return Some(RefOr::Ref(Ref::new(reference)));
    }

    let description = non_blank(&annotation.description);
    let extensions = get_extensions(&annotation.extensions);
    if description.is_none()
        && !annotation.required
        && extensions.is_none()
        && annotation.content.is_empty()
    {
        return None;
    }

    let mut body = RequestBodyBuilder::new().description(description).build();
    if annotation.required {
        body.required = Some(Required::True);
    }
    body.extensions = extensions;
    if let Some(content) = get_content(&annotation.content, config) {
        body.content = content.into_iter().collect();
    }
    Some(RefOr::T(body))
}
