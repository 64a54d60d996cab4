//! API handlers.

pub mod file;

pub use file::*;

use crate::config::Config;
use crate::file::FileStorage;
use crate::web::error::{ApiError, ErrorCode};
use crate::{Result, UploadError};

/// Message returned when the multipart body cannot be parsed.
pub const PARSE_ERROR_MESSAGE: &str = "Erro ao fazer upload do arquivo.";

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Upload storage.
    pub storage: FileStorage,
    /// Base URL used to build file links.
    pub public_url: String,
    /// Error code returned for multipart parse failures.
    pub parse_error_code: ErrorCode,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Multipart parse failures map to 500 until overridden with
    /// [`AppState::with_parse_error_status`].
    pub fn new(storage: FileStorage, public_url: impl Into<String>) -> Self {
        Self {
            storage,
            public_url: public_url.into().trim_end_matches('/').to_string(),
            parse_error_code: ErrorCode::InternalError,
        }
    }

    /// Build the state from configuration, creating the upload root.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = FileStorage::new(&config.storage.upload_dir)?;
        Self::new(storage, config.server.public_base_url())
            .with_parse_error_status(config.upload.parse_error_status)
    }

    /// Set the status used for multipart parse failures (400 or 500).
    pub fn with_parse_error_status(mut self, status: u16) -> Result<Self> {
        self.parse_error_code = ErrorCode::from_status(status).ok_or_else(|| {
            UploadError::Config(format!("unsupported parse error status: {status}"))
        })?;
        Ok(self)
    }

    /// Build the error returned for a multipart parse failure.
    pub fn parse_error(&self, details: impl Into<String>) -> ApiError {
        let details = details.into();
        tracing::warn!(details = %details, "Failed to parse multipart body");
        ApiError::with_details(self.parse_error_code, PARSE_ERROR_MESSAGE, details)
    }
}
