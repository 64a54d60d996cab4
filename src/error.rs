//! Error types for the upload server.

use thiserror::Error;

/// Common error type for the upload server.
#[derive(Error, Debug)]
pub enum UploadError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller-supplied path segment was rejected.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for upload server operations.
pub type Result<T> = std::result::Result<T, UploadError>;
