//! Error types for the roombook core library.

use thiserror::Error;

/// Result type alias using the roombook core Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for roombook operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Client-side validation failed before any network call
    #[error("Validation failed: {0}")]
    Validation(#[from] crate::validation::ValidationErrors),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
