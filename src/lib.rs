//! Upload Server
//!
//! Accepts multipart file uploads, stores them on disk under random names in
//! one of three scopes (root, users, per-protocol) and deletes them by name.

pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{Result, UploadError};
pub use file::{FileStorage, Scope, StoredFile};
pub use web::WebServer;
