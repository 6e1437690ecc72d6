#![deny(missing_docs)]

//! # Reader Configuration
//!
//! Knobs shared by every extraction call of a scan. The configuration is plain
//! data: callers build it in code or parse it from YAML/JSON text they already
//! hold.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Media type used for content declarations that do not name one.
pub const DEFAULT_MEDIA_TYPE: &str = "*/*";

/// Default bound on extension-chain dispatch depth.
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 256;

/// Settings for an operation scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReaderConfig {
    /// Route prefixes excluded from scanning (`/internal` hides `/internal/x`, not `/internals`).
    pub ignored_routes: Vec<String>,
    /// Type-name prefixes that are never extracted as parameters.
    pub ignored_type_prefixes: Vec<String>,
    /// Maximum number of chain hops along one call path.
    pub max_chain_depth: usize,
    /// Media type for content entries without an explicit one.
    pub default_media_type: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            ignored_routes: Vec::new(),
            ignored_type_prefixes: Vec::new(),
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            default_media_type: DEFAULT_MEDIA_TYPE.to_string(),
        }
    }
}

impl ReaderConfig {
    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> AppResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| AppError::Config(format!("Failed to parse reader YAML: {}", e)))
    }

    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AppError::Config(format!("Failed to parse reader JSON: {}", e)))
    }

    /// Returns true if the type name starts with one of the ignored prefixes.
    pub fn is_ignored_type(&self, type_name: &str) -> bool {
        self.ignored_type_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && type_name.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReaderConfig::default();
        assert!(config.ignored_routes.is_empty());
        assert_eq!(config.max_chain_depth, 256);
        assert_eq!(config.default_media_type, "*/*");
    }

    #[test]
    fn test_from_yaml_partial_keeps_defaults() {
        let yaml = r#"
ignoredRoutes:
  - /internal
ignoredTypePrefixes:
  - "javax.ws.rs."
"#;
        let config = ReaderConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.ignored_routes, vec!["/internal".to_string()]);
        assert!(config.is_ignored_type("javax.ws.rs.core.UriInfo"));
        assert!(!config.is_ignored_type("com.acme.User"));
        assert_eq!(config.max_chain_depth, DEFAULT_MAX_CHAIN_DEPTH);
    }

    #[test]
    fn test_from_json() {
        let config =
            ReaderConfig::from_json_str(r#"{"maxChainDepth": 8, "defaultMediaType": "application/json"}"#)
                .unwrap();
        assert_eq!(config.max_chain_depth, 8);
        assert_eq!(config.default_media_type, "application/json");
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = ReaderConfig::from_yaml_str("maxChainDepth: [nope").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
