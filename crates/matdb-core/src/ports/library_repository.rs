//! Library repository trait definition.

use async_trait::async_trait;

use super::MaterialDbError;
use crate::domain::Library;

/// Repository for libraries.
///
/// Removing a library cascades to its folders, models and materials.
#[async_trait]
pub trait LibraryRepository: Send + Sync {
    /// All libraries, ordered by name.
    async fn list_libraries(&self) -> Result<Vec<Library>, MaterialDbError>;

    /// Libraries holding at least one model.
    async fn list_libraries_with_models(&self) -> Result<Vec<Library>, MaterialDbError>;

    /// Libraries holding at least one material.
    async fn list_libraries_with_materials(&self) -> Result<Vec<Library>, MaterialDbError>;

    /// # Errors
    ///
    /// - `LibraryNotFound` if no library has that name
    async fn get_library(&self, name: &str) -> Result<Library, MaterialDbError>;

    /// Create a library.
    ///
    /// Succeeds silently when a library with the same name, icon and
    /// read-only flag already exists.
    ///
    /// # Errors
    ///
    /// - `LibraryCreation` if the name is taken with a different icon or flag
    async fn create_library(
        &self,
        name: &str,
        icon: Option<&[u8]>,
        read_only: bool,
    ) -> Result<(), MaterialDbError>;

    /// # Errors
    ///
    /// - `LibraryNotFound` if `old_name` does not exist
    /// - `Rename` if `new_name` is already used
    async fn rename_library(&self, old_name: &str, new_name: &str) -> Result<(), MaterialDbError>;

    /// Replace the icon. `None` or an empty slice clears it.
    async fn change_icon(&self, name: &str, icon: Option<&[u8]>) -> Result<(), MaterialDbError>;

    /// # Errors
    ///
    /// - `LibraryNotFound` if no library has that name
    /// - `Delete` for storage errors
    async fn remove_library(&self, name: &str) -> Result<(), MaterialDbError>;
}
