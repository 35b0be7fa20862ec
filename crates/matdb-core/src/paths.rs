//! Default on-disk locations.

use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving data directories.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the system data directory.
    #[error("Cannot determine system data directory")]
    NoDataDir,

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },
}

/// File name of the default database.
pub const DATABASE_FILE_NAME: &str = "materials.db";

/// Root directory for matdb data.
///
/// Resolution order:
/// 1. `MATDB_DATA_DIR` environment variable
/// 2. `<local data dir>/matdb`
///
/// The directory is created if it doesn't exist.
pub fn data_root() -> Result<PathBuf, PathError> {
    let root = match env::var("MATDB_DATA_DIR") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => dirs::data_local_dir()
            .ok_or(PathError::NoDataDir)?
            .join("matdb"),
    };

    fs::create_dir_all(&root).map_err(|e| PathError::CreateFailed {
        path: root.clone(),
        reason: e.to_string(),
    })?;

    Ok(root)
}

/// Path to the default database file inside [`data_root`].
pub fn database_path() -> Result<PathBuf, PathError> {
    Ok(data_root()?.join(DATABASE_FILE_NAME))
}

/// `sqlite:` URL for the default database file.
pub fn default_database_url() -> Result<String, PathError> {
    Ok(format!("sqlite:{}", database_path()?.display()))
}
