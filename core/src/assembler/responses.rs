#![deny(missing_docs)]

//! # Response Assembly

use crate::assembler::content::{get_content, get_extensions, get_headers, get_links};
use crate::config::ReaderConfig;
use crate::model::annotations::{non_blank, ResponseAnnotation};
use crate::refs::{component_ref, ComponentSection};
use utoipa::openapi::response::{Response, ResponseBuilder};
use utoipa::openapi::{Ref, RefOr, Responses};

/// Key for responses declared without a status code.
pub const DEFAULT_RESPONSE: &str = "default";

/// Builds the response set of an operation.
///
/// A `$ref` response ignores every other field. An inline response is kept
/// only when it has a description, content or headers. Entries are keyed by
/// status code or [`DEFAULT_RESPONSE`], later ones replacing earlier ones.
/// Returns `None` when no entry survives.
pub fn get_api_responses(
    declared: &[&ResponseAnnotation],
    config: &ReaderConfig,
) -> Option<Responses> {
    let mut responses = Responses::default();

    for annotation in declared {
        let key = non_blank(&annotation.response_code)
            .unwrap_or(DEFAULT_RESPONSE)
            .to_string();

        if let Some(reference) = non_blank(&annotation.reference) {
            let reference = component_ref(ComponentSection::Responses, reference);
            responses
                .responses
                .insert(key, RefOr::Ref(Ref::new(reference)));
            continue;
        }

        if let Some(response) = build_response(annotation, config) {
            responses.responses.insert(key, RefOr::T(response));
        }
    }

    (!responses.responses.is_empty()).then_some(responses)
}

fn build_response(annotation: &ResponseAnnotation, config: &ReaderConfig) -> Option<Response> {
    let description = non_blank(&annotation.description);
    let content = get_content(&annotation.content, config);
    let headers = get_headers(&annotation.headers);
    if description.is_none() && content.is_none() && headers.is_none() {
        return None;
    }

    let mut response = ResponseBuilder::new()
        .description(description.unwrap_or_default())
        .build();
    response.extensions = get_extensions(&annotation.extensions);
    if let Some(content) = content {
        response.content = content.into_iter().collect();
    }
    if let Some(headers) = headers {
        response.headers = headers.into_iter().collect();
    }
    response.links = get_links(&annotation.links)
        .into_iter()
        .map(|(name, link)| (name, RefOr::T(link)))
        .collect();
    Some(response)
}
