//! Test helpers for web API tests.
//!
//! Builds a router over a temporary upload root and provides multipart helpers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tempfile::TempDir;

use upload_server::web::handlers::AppState;
use upload_server::web::router::create_router;
use upload_server::FileStorage;

/// Base URL the test state builds file links with.
pub const PUBLIC_URL: &str = "http://localhost:3030";

/// Prefix of every returned `fileUrl`.
pub const FILE_URL_PREFIX: &str = "http://localhost:3030/uploads/";

/// A test server plus the temporary directory backing its upload root.
pub struct TestApp {
    pub server: TestServer,
    dir: TempDir,
}

impl TestApp {
    /// Upload root directory.
    pub fn upload_root(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Directory containing the upload root (outside of it).
    pub fn outside_root(&self) -> &Path {
        self.dir.path()
    }

    /// Map a returned `fileUrl` to its location on disk.
    pub fn path_for_url(&self, file_url: &str) -> PathBuf {
        let relative = file_url
            .strip_prefix(FILE_URL_PREFIX)
            .unwrap_or_else(|| panic!("unexpected file url: {file_url}"));
        relative
            .split('/')
            .fold(self.upload_root(), |path, segment| path.join(segment))
    }

    /// Number of regular files anywhere under the upload root.
    pub fn stored_file_count(&self) -> usize {
        fn count(dir: &Path) -> usize {
            std::fs::read_dir(dir)
                .map(|entries| {
                    entries
                        .flatten()
                        .map(|entry| {
                            let path = entry.path();
                            if path.is_dir() {
                                count(&path)
                            } else {
                                1
                            }
                        })
                        .sum()
                })
                .unwrap_or(0)
        }
        count(&self.upload_root())
    }
}

/// Create a test app with the default parse error status (500).
pub fn create_test_app() -> TestApp {
    create_test_app_with_parse_status(500)
}

/// Create a test app with a specific parse error status.
pub fn create_test_app_with_parse_status(status: u16) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let storage =
        FileStorage::new(dir.path().join("uploads")).expect("Failed to create storage");

    let app_state = AppState::new(storage, PUBLIC_URL)
        .with_parse_error_status(status)
        .expect("Invalid parse error status");

    let origins = vec![
        "http://localhost:3000".to_string(),
        "http://localhost:4000".to_string(),
    ];
    let router = create_router(Arc::new(app_state), &origins);

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp { server, dir }
}

/// Multipart form with a single `file` part.
pub fn file_form(filename: &str, content: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(content.to_vec())
            .file_name(filename.to_string())
            .mime_type("application/octet-stream"),
    )
}

/// Check that `name` is 32 lowercase hex characters followed by `extension`.
pub fn assert_generated_name(name: &str, extension: &str) {
    assert!(name.ends_with(extension), "{name} should end with {extension}");
    let id = &name[..name.len() - extension.len()];
    assert_eq!(id.len(), 32, "{name} should have a 32 character id");
    assert!(
        id.chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
        "{name} should be lowercase hex"
    );
}
