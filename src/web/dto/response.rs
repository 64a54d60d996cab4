//! Response DTOs for the upload API.

use serde::Serialize;

/// Successful upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Human-readable message.
    pub message: String,
    /// Public URL of the stored file.
    #[serde(rename = "fileUrl")]
    pub file_url: String,
}

impl UploadResponse {
    /// Create a new upload response.
    pub fn new(message: impl Into<String>, file_url: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file_url: file_url.into(),
        }
    }
}

/// Response carrying only a confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
