//! Folder repository trait definition.
//!
//! Paths are "/"-separated, relative to the library root. A single leading
//! "/" is accepted and ignored; `""` and `"/"` name the root itself.

use async_trait::async_trait;

use super::MaterialDbError;

#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// Every folder path in the library, sorted, without a leading slash.
    async fn list_folders(&self, library: &str) -> Result<Vec<String>, MaterialDbError>;

    /// Create every missing segment of `path`. Idempotent.
    async fn create_folder(&self, library: &str, path: &str) -> Result<(), MaterialDbError>;

    /// Rename the final segment of `old_path`.
    ///
    /// # Errors
    ///
    /// - `Rename` unless both paths have the same ancestors and `old_path` exists
    async fn rename_folder(
        &self,
        library: &str,
        old_path: &str,
        new_path: &str,
    ) -> Result<(), MaterialDbError>;

    /// Delete the folder at `path` with everything beneath it.
    ///
    /// # Errors
    ///
    /// - `Delete` if any segment of `path` does not exist; nothing is removed
    async fn delete_folder_recursive(&self, library: &str, path: &str)
    -> Result<(), MaterialDbError>;
}
