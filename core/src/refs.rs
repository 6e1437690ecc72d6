#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Normalises `$ref` values written in annotations. A bare component name is
//! expanded to a local JSON Pointer under `#/components/{section}/`; anything
//! that already looks like a pointer or a URI is kept verbatim.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a pointer segment, beyond the `~0`/`~1` rules.
const SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'<').add(b'>');

/// Component sections a reference can point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentSection {
    /// `#/components/schemas/`
    Schemas,
    /// `#/components/parameters/`
    Parameters,
    /// `#/components/requestBodies/`
    RequestBodies,
    /// `#/components/responses/`
    Responses,
}

impl ComponentSection {
    /// Section key inside `components`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentSection::Schemas => "schemas",
            ComponentSection::Parameters => "parameters",
            ComponentSection::RequestBodies => "requestBodies",
            ComponentSection::Responses => "responses",
        }
    }
}

/// Expands a bare component name into a local reference.
///
/// `Limit` becomes `#/components/parameters/Limit` for
/// [`ComponentSection::Parameters`]; `#/components/...`, relative files and
/// URLs (anything containing `/` or `.`) are returned trimmed but otherwise
/// unchanged.
pub fn component_ref(section: ComponentSection, raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains('/') || raw.contains('.') {
        return raw.to_string();
    }
    format!(
        "#/components/{}/{}",
        section.as_str(),
        encode_pointer_segment(raw)
    )
}

/// Encodes a JSON Pointer segment (`~` to `~0`, `/` to `~1`, then percent-encoding).
pub(crate) fn encode_pointer_segment(segment: &str) -> String {
    let escaped = segment.replace('~', "~0").replace('/', "~1");
    utf8_percent_encode(&escaped, SEGMENT).to_string()
}
