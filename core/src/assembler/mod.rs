#![deny(missing_docs)]

//! # Operation Assembler
//!
//! Turns method-level request body and response declarations into the
//! finished model fragments.
//!
//! Handles:
//! - `$ref` short-circuiting for bodies and responses.
//! - Suppression of default-valued declarations (absent, never empty).
//! - Content, headers, links and specification extensions.

pub mod body;
pub mod content;
pub mod responses;

pub use body::get_request_body;
pub use content::{get_content, get_extensions, get_headers, get_links};
pub use responses::{get_api_responses, DEFAULT_RESPONSE};
