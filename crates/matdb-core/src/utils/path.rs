//! Library folder paths.
//!
//! A path is a "/"-separated list of folder names relative to the library
//! root. One leading "/" is tolerated. `""` and `"/"` both denote the root.

use crate::ports::MaterialDbError;

/// Split a path into its folder names.
///
/// # Errors
///
/// `Validation` if the path contains an empty segment (`"a//b"`, `"a/"`).
pub fn split_path(path: &str) -> Result<Vec<&str>, MaterialDbError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(MaterialDbError::Validation(format!(
            "empty folder name in path '{path}'"
        )));
    }
    Ok(segments)
}

/// Join folder names into the canonical form: no leading slash, single "/" separators.
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}
