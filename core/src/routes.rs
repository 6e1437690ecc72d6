#![deny(missing_docs)]

//! # Route Resolution
//!
//! Builds normalized operation paths from class, method and parent fragments,
//! resolves HTTP verbs, and matches paths against the ignore list.

use crate::config::ReaderConfig;
use crate::error::AppResult;
use crate::extension::chain::ExtensionChain;
use crate::model::annotations::{MappingAnnotation, MappingVerb, RequestMappingAnnotation};
use crate::model::operation::{HttpMethod, MethodDescriptor};

/// Verb mappings consulted before the chain, in priority order.
const VERB_LOOKUP: [(MappingVerb, HttpMethod); 5] = [
    (MappingVerb::Get, HttpMethod::Get),
    (MappingVerb::Put, HttpMethod::Put),
    (MappingVerb::Post, HttpMethod::Post),
    (MappingVerb::Delete, HttpMethod::Delete),
    (MappingVerb::Patch, HttpMethod::Patch),
];

/// Appends one path fragment.
///
/// `None`, `""` and `"/"` are no-ops. A fragment not starting with `/` gets
/// one unless the path already ends in `/`; one trailing `/` is dropped.
pub fn append_path_component(component: Option<&str>, to: &mut String) {
    let Some(component) = component else {
        return;
    };
    if component.is_empty() || component == "/" {
        return;
    }
    if !component.starts_with('/') && !to.ends_with('/') {
        to.push('/');
    }
    to.push_str(component.strip_suffix('/').unwrap_or(component));
}

/// Builds the operation path.
///
/// Fragments are appended parent, class (skipped for subresources), method.
/// Returns `None` when there is no class mapping, no method and no parent
/// fragment; `"/"` when inputs exist but contribute nothing.
pub fn get_path(
    class_mapping: Option<&RequestMappingAnnotation>,
    method: Option<&MethodDescriptor>,
    parent_path: Option<&str>,
    is_subresource: bool,
) -> Option<String> {
    if class_mapping.is_none() && method.is_none() && parent_path.map_or(true, str::is_empty) {
        return None;
    }

    let mut path = String::new();
    append_path_component(parent_path, &mut path);
    if let Some(mapping) = class_mapping.filter(|_| !is_subresource) {
        append_path_component(mapping.first_path(), &mut path);
    }
    if let Some(method) = method {
        append_path_component(extract_method_path(method), &mut path);
    }

    if path.is_empty() {
        path.push('/');
    }
    Some(path)
}

/// The mapping that decides a method's verb, if any.
fn verb_mapping(method: &MethodDescriptor) -> Option<(&MappingAnnotation, HttpMethod)> {
    VERB_LOOKUP.iter().find_map(|(verb, http)| {
        method
            .mappings()
            .find(|m| m.verb == *verb)
            .map(|m| (m, *http))
    })
}

/// The method-level path fragment.
///
/// Taken from the verb mapping, else from a method-level `RequestMapping`.
pub fn extract_method_path(method: &MethodDescriptor) -> Option<&str> {
    match verb_mapping(method) {
        Some((mapping, _)) => mapping.paths.first().map(String::as_str),
        None => method.request_mapping().and_then(|m| m.first_path()),
    }
}

/// Resolves the HTTP verb of a method.
///
/// Only GET, PUT, POST, DELETE and PATCH have a dedicated mapping; any other
/// verb has to come from a chain handler. `None` means the operation must not
/// be emitted.
pub fn extract_operation_method(
    method: &MethodDescriptor,
    chain: ExtensionChain<'_>,
) -> AppResult<Option<HttpMethod>> {
    if let Some((_, verb)) = verb_mapping(method) {
        return Ok(Some(verb));
    }
    let verb = chain.extract_operation_method(method)?;
    if verb.is_none() {
        tracing::debug!(method = %method.name, "No HTTP verb resolved");
    }
    Ok(verb)
}

/// True if `path` equals an ignored route or continues one at a `/` boundary.
pub fn is_ignored(path: &str, config: &ReaderConfig) -> bool {
    config.ignored_routes.iter().any(|item| {
        path.strip_prefix(item.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}
