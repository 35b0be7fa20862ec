//! Validation of caller-supplied identifiers and names.

use uuid::Uuid;

use crate::ports::MaterialDbError;

/// Longest name accepted for libraries, folders, models and materials.
pub const MAX_NAME_LEN: usize = 255;

/// Check that `uuid` is a hyphenated UUID as stored in the uuid columns.
///
/// # Examples
///
/// ```rust
/// use matdb_core::utils::validate_uuid;
///
/// assert!(validate_uuid("3d1a6141-d032-4d82-8bb5-a8f339fff8ad").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(uuid: &str) -> Result<(), MaterialDbError> {
    match Uuid::try_parse(uuid) {
        Ok(parsed) if parsed.hyphenated().to_string().eq_ignore_ascii_case(uuid) => Ok(()),
        _ => Err(MaterialDbError::Validation(format!("invalid uuid '{uuid}'"))),
    }
}

/// Check that a display name is non-blank, single-line and short enough.
pub fn validate_name(kind: &str, name: &str) -> Result<(), MaterialDbError> {
    if name.trim().is_empty() {
        return Err(MaterialDbError::Validation(format!("{kind} name is empty")));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(MaterialDbError::Validation(format!(
            "{kind} name exceeds {MAX_NAME_LEN} bytes"
        )));
    }
    if name.contains(['\n', '\r']) {
        return Err(MaterialDbError::Validation(format!(
            "{kind} name spans multiple lines"
        )));
    }
    Ok(())
}

/// A fresh random uuid in the stored form.
pub fn new_uuid() -> String {
    Uuid::new_v4().hyphenated().to_string()
}
