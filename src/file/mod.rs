//! File storage module.
//!
//! This module provides the on-disk side of uploads:
//! - Random stored names that keep the original extension
//! - Scopes (root, users, per-protocol) and path segment validation
//! - Creating and deleting files inside a scope

mod naming;
mod scope;
mod storage;

pub use naming::{extract_extension, generate_stored_name};
pub use scope::{validate_segment, Scope, MAX_SEGMENT_LENGTH, USERS_DIR};
pub use storage::{FileStorage, StoredFile};
