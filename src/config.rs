//! Configuration module for the upload server.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, UploadError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL used when building `fileUrl` values (e.g. "https://files.example.com").
    ///
    /// Falls back to `http://localhost:{port}` when unset.
    #[serde(default)]
    pub public_url: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3030
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
        }
    }
}

impl ServerConfig {
    /// Base URL for links to stored files, without a trailing slash.
    pub fn public_base_url(&self) -> String {
        match &self.public_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("http://localhost:{}", self.port),
        }
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding every upload scope.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
        }
    }
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins.
    #[serde(default = "default_cors_origins")]
    pub origins: Vec<String>,
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:4000".to_string(),
    ]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_cors_origins(),
        }
    }
}

/// Upload endpoint behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// HTTP status returned when the multipart body cannot be parsed (400 or 500).
    #[serde(default = "default_parse_error_status")]
    pub parse_error_status: u16,
}

fn default_parse_error_status() -> u16 {
    500
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            parse_error_status: default_parse_error_status(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/upload-server.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Upload endpoint configuration.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(UploadError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| UploadError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: listening port
    /// - `UPLOAD_PUBLIC_URL`: base URL for returned file links
    /// - `UPLOAD_DIR`: upload root directory
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| UploadError::Config(format!("invalid PORT value: {port}")))?;
        }

        if let Some(url) = lookup("UPLOAD_PUBLIC_URL").filter(|v| !v.is_empty()) {
            self.server.public_url = Some(url);
        }

        if let Some(dir) = lookup("UPLOAD_DIR").filter(|v| !v.is_empty()) {
            self.storage.upload_dir = dir;
        }

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - `upload.parse_error_status` is neither 400 nor 500
    /// - `storage.upload_dir` is empty
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.upload.parse_error_status, 400 | 500) {
            return Err(UploadError::Config(format!(
                "upload.parse_error_status must be 400 or 500, got {}",
                self.upload.parse_error_status
            )));
        }
        if self.storage.upload_dir.trim().is_empty() {
            return Err(UploadError::Config(
                "storage.upload_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
