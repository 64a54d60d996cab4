//! File storage for uploads.
//!
//! Files are stored flat inside their scope directory:
//! ```text
//! {base_path}/
//! ├── 3f2a...9c.png          (root scope)
//! ├── users/
//! │   └── 81b0...4e.jpg
//! └── {protocolo}/
//!     └── c7d1...02.pdf
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};

use super::naming::generate_stored_name;
use super::scope::{validate_segment, Scope};
use crate::{Result, UploadError};

/// A file written into a scope under a generated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Scope the file lives in.
    pub scope: Scope,
    /// Generated name (hex identifier plus original extension).
    pub name: String,
    /// Absolute path on disk.
    pub path: PathBuf,
}

impl StoredFile {
    /// Public URL of this file given the server base URL and static prefix.
    pub fn url(&self, base_url: &str, static_prefix: &str) -> String {
        format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            static_prefix.trim_matches('/'),
            self.scope.url_path(&self.name)
        )
    }
}

/// Storage service for uploaded files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Upload root directory.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Directory backing `scope`.
    pub fn scope_dir(&self, scope: &Scope) -> PathBuf {
        scope.dir_under(&self.base_path)
    }

    /// Ensure the scope directory exists, creating missing parents.
    ///
    /// A directory that already exists, or is created concurrently, is not an error.
    pub async fn ensure_scope_dir(&self, scope: &Scope) -> Result<PathBuf> {
        let dir = self.scope_dir(scope);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Create an empty file for an upload named `original_name`.
    ///
    /// Returns the stored file description and an open handle to write the
    /// content into.
    pub async fn create(&self, scope: &Scope, original_name: &str) -> Result<(StoredFile, File)> {
        let dir = self.ensure_scope_dir(scope).await?;
        let name = generate_stored_name(original_name);
        let path = dir.join(&name);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        Ok((
            StoredFile {
                scope: scope.clone(),
                name,
                path,
            },
            file,
        ))
    }

    /// Remove a partially written file. Errors are ignored.
    pub async fn discard(&self, stored: &StoredFile) {
        if let Err(e) = fs::remove_file(&stored.path).await {
            tracing::warn!(path = %stored.path.display(), error = %e, "Failed to discard partial upload");
        }
    }

    /// Delete a file from a scope.
    ///
    /// Returns [`UploadError::NotFound`] if the file does not exist, including
    /// when a concurrent delete removed it first.
    pub async fn delete(&self, scope: &Scope, name: &str) -> Result<()> {
        let path = self.file_path(scope, name)?;

        if !fs::try_exists(&path).await? {
            return Err(UploadError::NotFound(format!("File: {name}")));
        }

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(UploadError::NotFound(format!("File: {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Full path of `name` inside `scope`, after validating the name.
    pub fn file_path(&self, scope: &Scope, name: &str) -> Result<PathBuf> {
        let name = validate_segment(name)?;
        Ok(self.scope_dir(scope).join(name))
    }
}
