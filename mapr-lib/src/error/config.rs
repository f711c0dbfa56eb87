//! Configuration error types

use std::path::PathBuf;

/// Errors raised while reading menu or client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid JSON for the expected shape.
    #[error("Invalid menu configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A menu was requested that the registry does not know.
    #[error("Unknown menu '{0}'")]
    UnknownMenu(String),

    /// The base URL could not be parsed.
    #[error("Invalid base URL '{url}': {message}")]
    BaseUrl { url: String, message: String },
}
