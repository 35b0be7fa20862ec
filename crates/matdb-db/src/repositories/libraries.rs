//! Library lookups shared by every repository.

use sqlx::SqliteConnection;

use matdb_core::MaterialDbError;

use super::error::{StoreError, StoreResult};
use super::row_mappers::{LibraryRow, SELECT_LIBRARY_BY_ID, SELECT_LIBRARY_BY_NAME};

pub(crate) async fn library_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> StoreResult<Option<LibraryRow>> {
    let row = sqlx::query_as::<_, LibraryRow>(SELECT_LIBRARY_BY_NAME)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

/// # Errors
///
/// `LibraryNotFound` if no library has that name.
pub(crate) async fn require_library(
    conn: &mut SqliteConnection,
    name: &str,
) -> StoreResult<LibraryRow> {
    library_by_name(conn, name)
        .await?
        .ok_or_else(|| MaterialDbError::LibraryNotFound(name.to_string()).into())
}

/// # Errors
///
/// `LibraryNotFound`, or `LibraryReadOnly` if the library rejects mutation.
pub(crate) async fn require_writable(
    conn: &mut SqliteConnection,
    name: &str,
) -> StoreResult<LibraryRow> {
    let row = require_library(conn, name).await?;
    writable(row)
}

/// Library owning a stored object.
pub(crate) async fn library_by_id(conn: &mut SqliteConnection, id: i64) -> StoreResult<LibraryRow> {
    sqlx::query_as::<_, LibraryRow>(SELECT_LIBRARY_BY_ID)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| StoreError::storage(format!("library {id} does not exist")))
}

pub(crate) async fn require_writable_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> StoreResult<LibraryRow> {
    let row = library_by_id(conn, id).await?;
    writable(row)
}

fn writable(row: LibraryRow) -> StoreResult<LibraryRow> {
    if row.library_read_only {
        return Err(MaterialDbError::LibraryReadOnly(row.library_name).into());
    }
    Ok(row)
}
