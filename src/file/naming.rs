//! Random stored-name generation.

use std::path::Path;

use crate::file::scope::{is_forbidden_char, MAX_SEGMENT_LENGTH};

/// Length of the random part of a stored name.
const ID_LENGTH: usize = 32;

/// Generate a new stored name for an uploaded file.
///
/// The name is a 128-bit random identifier rendered as 32 lowercase hex
/// characters, followed by the original extension (with its dot) when the
/// original has one.
pub fn generate_stored_name(original_name: &str) -> String {
    let id: u128 = rand::random();
    format!("{id:032x}{}", extract_extension(original_name))
}

/// Extract the extension of `filename`, including the leading dot.
///
/// The extension is kept as sent, non-ASCII included. It is dropped only when
/// it holds a path separator or control character, or would push the stored
/// name past the filesystem's segment limit.
pub fn extract_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|ext| is_storable_extension(ext))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

fn is_storable_extension(ext: &str) -> bool {
    !ext.is_empty()
        && ID_LENGTH + 1 + ext.len() <= MAX_SEGMENT_LENGTH
        && !ext.chars().any(is_forbidden_char)
}
