//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the crate.
//!
//! Malformed or unsupported metadata never produces an error: it resolves to
//! an absent or empty value. Errors are reserved for broken configuration,
//! such as an extension that keeps re-entering the chain without making
//! progress.

use derive_more::Display;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
#[derive(Debug, Display)]
pub enum AppError {
    /// The extension chain was entered more often than the configured limit allows.
    #[display("Extension chain exceeded depth limit {limit} (reached {depth})")]
    ChainDepthExceeded {
        /// Depth reached when the guard tripped.
        depth: usize,
        /// Configured maximum depth.
        limit: usize,
    },

    /// Reader configuration could not be parsed.
    #[display("Configuration Error: {_0}")]
    Config(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
