//! Upload scopes and path segment validation.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{Result, UploadError};

/// Maximum length of a caller-supplied path segment, in bytes.
pub const MAX_SEGMENT_LENGTH: usize = 255;

/// Name of the user uploads subdirectory.
pub const USERS_DIR: &str = "users";

/// A storage namespace under the upload root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// The upload root itself.
    Root,
    /// The `users` subdirectory.
    Users,
    /// A subdirectory named after a protocol (ticket/request) identifier.
    Protocol(String),
}

impl Scope {
    /// Build a protocol scope, rejecting identifiers that are not a single safe segment.
    pub fn protocol(id: &str) -> Result<Self> {
        validate_segment(id)?;
        Ok(Scope::Protocol(id.to_string()))
    }

    /// Directory of this scope relative to the upload root.
    pub fn relative_dir(&self) -> Option<&str> {
        match self {
            Scope::Root => None,
            Scope::Users => Some(USERS_DIR),
            Scope::Protocol(id) => Some(id),
        }
    }

    /// Absolute directory of this scope under `root`.
    pub fn dir_under(&self, root: &Path) -> PathBuf {
        match self.relative_dir() {
            Some(dir) => root.join(dir),
            None => root.to_path_buf(),
        }
    }

    /// URL path of a stored file in this scope, relative to the static prefix.
    pub fn url_path(&self, stored_name: &str) -> String {
        match self.relative_dir() {
            Some(dir) => format!("{dir}/{stored_name}"),
            None => stored_name.to_string(),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Root => write!(f, "root"),
            Scope::Users => write!(f, "users"),
            Scope::Protocol(id) => write!(f, "protocol:{id}"),
        }
    }
}

/// Check that `segment` is a single, safe path component.
///
/// Accepted: 1..=255 bytes, not starting with a dot, with no path separator,
/// NUL or other control character. This rules out `.`, `..`, nested paths and
/// hidden files while still accepting every name the server generates.
pub fn validate_segment(segment: &str) -> Result<&str> {
    let valid = !segment.is_empty()
        && segment.len() <= MAX_SEGMENT_LENGTH
        && !segment.starts_with('.')
        && !segment.chars().any(is_forbidden_char);

    if valid {
        Ok(segment)
    } else {
        Err(UploadError::InvalidName(segment.to_string()))
    }
}

/// Characters never allowed inside a stored name.
pub(crate) fn is_forbidden_char(c: char) -> bool {
    matches!(c, '/' | '\\') || c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_segment_accepts() {
        for ok in [
            "photo.png",
            "0123456789abcdef0123456789abcdef.pdf",
            "2024-000123",
            "ticket_42",
            "a",
            "name with space",
            "ação",
            "0123456789abcdef0123456789abcdef.日本",
            "a..b",
        ] {
            assert!(validate_segment(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn test_validate_segment_rejects_traversal() {
        for bad in [
            "",
            ".",
            "..",
            "../../etc",
            "..\\..\\etc",
            "a/b",
            "/etc/passwd",
            ".hidden",
            "nul\0byte",
            "line\nbreak",
            "back\\slash",
        ] {
            assert!(
                matches!(validate_segment(bad), Err(UploadError::InvalidName(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_validate_segment_length_limit() {
        let longest = "a".repeat(MAX_SEGMENT_LENGTH);
        assert!(validate_segment(&longest).is_ok());

        let too_long = "a".repeat(MAX_SEGMENT_LENGTH + 1);
        assert!(validate_segment(&too_long).is_err());
    }

    #[test]
    fn test_protocol_scope() {
        assert_eq!(
            Scope::protocol("2024-001").unwrap(),
            Scope::Protocol("2024-001".to_string())
        );
        assert!(Scope::protocol("../../etc").is_err());
    }

    #[test]
    fn test_scope_dirs() {
        let root = Path::new("/srv/uploads");

        assert_eq!(Scope::Root.dir_under(root), root);
        assert_eq!(Scope::Users.dir_under(root), root.join("users"));
        assert_eq!(
            Scope::Protocol("p1".to_string()).dir_under(root),
            root.join("p1")
        );
    }

    #[test]
    fn test_scope_url_path() {
        assert_eq!(Scope::Root.url_path("abc.png"), "abc.png");
        assert_eq!(Scope::Users.url_path("abc.png"), "users/abc.png");
        assert_eq!(
            Scope::Protocol("p1".to_string()).url_path("abc.png"),
            "p1/abc.png"
        );
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Root.to_string(), "root");
        assert_eq!(Scope::Protocol("p1".to_string()).to_string(), "protocol:p1");
    }
}
