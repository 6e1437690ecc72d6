#![deny(missing_docs)]

//! # Content Assembly
//!
//! Converts content, header, link and extension declarations into `utoipa`
//! model values. Every helper returns `None` instead of an empty container.

use crate::config::ReaderConfig;
use crate::model::annotations::{
    non_blank, ContentAnnotation, ExtensionAnnotation, HeaderAnnotation, LinkAnnotation,
};
use crate::processor::parse_example;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use utoipa::openapi::content::{Content, ContentBuilder};
use utoipa::openapi::extensions::Extensions;
use utoipa::openapi::header::{Header, HeaderBuilder};
use utoipa::openapi::link::{Link, LinkBuilder};

/// Content entries keyed by media type.
///
/// Entries without a media type use the configured default; a later entry
/// replaces an earlier one with the same media type.
pub fn get_content(
    declared: &[ContentAnnotation],
    config: &ReaderConfig,
) -> Option<BTreeMap<String, Content>> {
    if declared.is_empty() {
        return None;
    }
    let mut content = BTreeMap::new();
    for entry in declared {
        let media_type = non_blank(&entry.media_type)
            .unwrap_or(config.default_media_type.as_str())
            .to_string();
        let mut built = ContentBuilder::new().schema(entry.schema.clone()).build();
        built.example = non_blank(&entry.example).map(parse_example);
        content.insert(media_type, built);
    }
    Some(content)
}

/// Headers keyed by name; unnamed declarations are skipped.
pub fn get_headers(declared: &[HeaderAnnotation]) -> Option<BTreeMap<String, Header>> {
    let headers: BTreeMap<String, Header> = declared
        .iter()
        .filter(|h| !h.name.trim().is_empty())
        .map(|h| {
            let mut builder = HeaderBuilder::new().description(non_blank(&h.description));
            if let Some(schema) = &h.schema {
                builder = builder.schema(schema.clone());
            }
            (h.name.clone(), builder.build())
        })
        .collect();
    (!headers.is_empty()).then_some(headers)
}

/// Links keyed by name; unnamed declarations are skipped.
pub fn get_links(declared: &[LinkAnnotation]) -> BTreeMap<String, Link> {
    declared
        .iter()
        .filter(|l| !l.name.trim().is_empty())
        .map(|l| {
            let mut builder = LinkBuilder::new();
            if let Some(operation_ref) = non_blank(&l.operation_ref) {
                builder = builder.operation_ref(operation_ref);
            }
            if let Some(operation_id) = non_blank(&l.operation_id) {
                builder = builder.operation_id(operation_id);
            }
            if let Some(description) = non_blank(&l.description) {
                builder = builder.description(description);
            }
            for parameter in &l.parameters {
                builder = builder.parameter(
                    parameter.name.as_str(),
                    JsonValue::String(parameter.expression.clone()),
                );
            }
            (l.name.clone(), builder.build())
        })
        .collect()
}

/// Specification extensions.
///
/// A named declaration groups its properties into one object under
/// `x-<name>`; an unnamed one contributes one `x-<property>` key per property.
pub fn get_extensions(declared: &[ExtensionAnnotation]) -> Option<Extensions> {
    let mut extensions = Extensions::default();
    for extension in declared {
        let name = extension.name.trim();
        if name.is_empty() {
            for property in &extension.properties {
                if property.name.trim().is_empty() {
                    continue;
                }
                extensions.insert(
                    prefixed(&property.name),
                    property_value(&property.value, property.parse_value),
                );
            }
        } else {
            let group: Map<String, JsonValue> = extension
                .properties
                .iter()
                .filter(|p| !p.name.trim().is_empty())
                .map(|p| (p.name.clone(), property_value(&p.value, p.parse_value)))
                .collect();
            extensions.insert(prefixed(name), JsonValue::Object(group));
        }
    }
    (!extensions.is_empty()).then_some(extensions)
}

fn prefixed(key: &str) -> String {
    if key.starts_with("x-") {
        key.to_string()
    } else {
        format!("x-{}", key)
    }
}

fn property_value(raw: &str, parse: bool) -> JsonValue {
    if parse {
        parse_example(raw)
    } else {
        JsonValue::String(raw.to_string())
    }
}
