//! Error types for schedule configuration
//!
//! Projection itself is total; only loading a [`crate::ProjectorConfig`] can fail.

use std::path::PathBuf;

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed to open
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or shape error
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON syntax or shape error
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither `.toml` nor `.json`
    #[error("unsupported config format: {0} (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),

    /// Offset is negative
    #[error("{field} must not be negative (got {value})")]
    NegativeOffset {
        /// Offending setting
        field: &'static str,
        /// Configured value
        value: i64,
    },

    /// Audit catalogue row without a label
    #[error("audit catalogue entry {index} has an empty label")]
    EmptyLabel {
        /// Position in the catalogue
        index: usize,
    },
}

/// Result alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
