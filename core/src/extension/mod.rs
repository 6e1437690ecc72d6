#![deny(missing_docs)]

//! # Extension Module
//!
//! Chain-of-responsibility handlers that resolve verbs and parameters and
//! decorate assembled operations.

pub mod chain;
pub mod default;
pub mod request;

pub use chain::{Extension, ExtensionChain, ExtensionRegistry};
pub use default::DefaultParameterExtension;
pub use request::{ExtractionRequest, ScanContext, TypeExclusionSet, ViewToken};
