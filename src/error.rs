//! Error types for the diff engine

use thiserror::Error;

/// Result type for diff operations
pub type Result<T> = std::result::Result<T, DiffError>;

/// Diff engine errors
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Invalid filter expression '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Malformed composition: '{keyword}' must list at least one schema")]
    MalformedComposition { keyword: &'static str },

    #[error("Schema nesting exceeds maximum depth of {depth}")]
    SchemaDepthExceeded { depth: usize },

    #[error("Content map must hold exactly one media type, found {count}")]
    MalformedContent { count: usize },

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
