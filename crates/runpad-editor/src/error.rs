//! Error types for the editor crate.

use thiserror::Error;

/// Errors that can occur in editor session operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    /// The language id is not in the catalog.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// The theme name is not recognised.
    #[error("unknown theme: {0} (expected light or dark)")]
    UnknownTheme(String),
}

/// Result type for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
