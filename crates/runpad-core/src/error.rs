//! Error types for the core crate.

use thiserror::Error;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API base URL could not be parsed.
    #[error("invalid API URL '{url}': {source}")]
    InvalidApiUrl {
        /// The rejected value.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },

    /// The API base URL is not an http(s) URL.
    #[error("unsupported API URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
