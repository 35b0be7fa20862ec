//! Path/folder resolution.
//!
//! Folder paths are resolved segment by segment against the `folder` tree.
//! `None` stands for the library root, which has no folder row.

use std::collections::HashSet;

use sqlx::SqliteConnection;

use matdb_core::MaterialDbError;
use matdb_core::utils::{join_path, split_path, validate_name};

use super::error::{StoreError, StoreResult};

const FIND_CHILD: &str =
    "SELECT folder_id FROM folder WHERE library_id = ? AND folder_name = ? AND parent_id IS ?";

/// Resolve `path` to a folder id, creating missing segments. Idempotent.
pub(crate) async fn resolve_path(
    conn: &mut SqliteConnection,
    library_id: i64,
    path: &str,
) -> StoreResult<Option<i64>> {
    let mut parent: Option<i64> = None;
    for segment in split_path(path)? {
        validate_name("folder", segment)?;
        let existing: Option<i64> = sqlx::query_scalar(FIND_CHILD)
            .bind(library_id)
            .bind(segment)
            .bind(parent)
            .fetch_optional(&mut *conn)
            .await?;

        let id = match existing {
            Some(id) => id,
            None => sqlx::query(
                "INSERT INTO folder (folder_name, library_id, parent_id) VALUES (?, ?, ?)",
            )
            .bind(segment)
            .bind(library_id)
            .bind(parent)
            .execute(&mut *conn)
            .await?
            .last_insert_rowid(),
        };
        parent = Some(id);
    }
    Ok(parent)
}

/// Look `path` up without creating anything.
///
/// `Some(None)` is the root; `None` means a segment is missing.
pub(crate) async fn find_path(
    conn: &mut SqliteConnection,
    library_id: i64,
    path: &str,
) -> StoreResult<Option<Option<i64>>> {
    let mut parent: Option<i64> = None;
    for segment in split_path(path)? {
        let found: Option<i64> = sqlx::query_scalar(FIND_CHILD)
            .bind(library_id)
            .bind(segment)
            .bind(parent)
            .fetch_optional(&mut *conn)
            .await?;
        match found {
            Some(id) => parent = Some(id),
            None => return Ok(None),
        }
    }
    Ok(Some(parent))
}

/// Path of `folder_id`: walk to the root, then reverse.
pub(crate) async fn path_of(
    conn: &mut SqliteConnection,
    folder_id: Option<i64>,
) -> StoreResult<String> {
    let mut names = Vec::new();
    let mut visited = HashSet::new();
    let mut current = folder_id;

    while let Some(id) = current {
        if !visited.insert(id) {
            return Err(StoreError::storage(format!(
                "folder {id} is its own ancestor"
            )));
        }
        let row: Option<(String, Option<i64>)> =
            sqlx::query_as("SELECT folder_name, parent_id FROM folder WHERE folder_id = ?")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        let (name, parent) =
            row.ok_or_else(|| StoreError::storage(format!("folder {id} does not exist")))?;
        names.push(name);
        current = parent;
    }

    names.reverse();
    Ok(join_path(&names))
}

/// Same result as [`path_of`] in a single recursive query.
pub(crate) async fn path_of_recursive(
    conn: &mut SqliteConnection,
    folder_id: Option<i64>,
) -> StoreResult<String> {
    let Some(id) = folder_id else {
        return Ok(String::new());
    };

    let names: Vec<String> = sqlx::query_scalar(
        r"
        WITH RECURSIVE up (folder_id, folder_name, parent_id, depth) AS (
            SELECT folder_id, folder_name, parent_id, 0 FROM folder WHERE folder_id = ?
            UNION ALL
            SELECT f.folder_id, f.folder_name, f.parent_id, up.depth + 1
            FROM folder f
            JOIN up ON f.folder_id = up.parent_id
        )
        SELECT folder_name FROM up ORDER BY depth DESC
        ",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    if names.is_empty() {
        return Err(StoreError::storage(format!("folder {id} does not exist")));
    }
    Ok(join_path(&names))
}

/// Rename the last segment of `old_path` to the last segment of `new_path`.
pub(crate) async fn rename_path(
    conn: &mut SqliteConnection,
    library_id: i64,
    old_path: &str,
    new_path: &str,
) -> StoreResult<()> {
    let rename = |msg: String| StoreError::Domain(MaterialDbError::Rename(msg));

    let old_segments = split_path(old_path)?;
    let new_segments = split_path(new_path)?;
    let (Some((old_name, old_parents)), Some((new_name, new_parents))) =
        (old_segments.split_last(), new_segments.split_last())
    else {
        return Err(rename("the library root cannot be renamed".to_string()));
    };
    if old_parents != new_parents {
        return Err(rename(format!(
            "'{old_path}' and '{new_path}' differ before the final folder"
        )));
    }
    validate_name("folder", new_name)?;

    let folder = find_path(conn, library_id, old_path)
        .await?
        .flatten()
        .ok_or_else(|| rename(format!("folder '{old_path}' does not exist")))?;
    if old_name == new_name {
        return Ok(());
    }
    if find_path(conn, library_id, new_path).await?.is_some() {
        return Err(rename(format!("folder '{new_path}' already exists")));
    }

    sqlx::query("UPDATE folder SET folder_name = ? WHERE folder_id = ?")
        .bind(*new_name)
        .bind(folder)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Delete the folder at `path` and, by cascade, everything beneath it.
pub(crate) async fn delete_recursive(
    conn: &mut SqliteConnection,
    library_id: i64,
    path: &str,
) -> StoreResult<()> {
    let delete = |msg: String| StoreError::Domain(MaterialDbError::Delete(msg));

    if split_path(path)?.is_empty() {
        return Err(delete("the library root cannot be deleted".to_string()));
    }
    let folder = find_path(conn, library_id, path)
        .await?
        .flatten()
        .ok_or_else(|| delete(format!("folder '{path}' does not exist")))?;

    sqlx::query("DELETE FROM folder WHERE folder_id = ?")
        .bind(folder)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Every folder path in a library, sorted.
pub(crate) async fn list_paths(
    conn: &mut SqliteConnection,
    library_id: i64,
) -> StoreResult<Vec<String>> {
    let paths = sqlx::query_scalar("SELECT path FROM folder_path WHERE library_id = ? ORDER BY path")
        .bind(library_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use crate::setup::setup_test_database;

    async fn with_library() -> (Database, i64) {
        let db = setup_test_database().await.unwrap();
        let id = {
            let mut conn = db.acquire().await.unwrap();
            sqlx::query("INSERT INTO library (library_name) VALUES ('System')")
                .execute(&mut *conn)
                .await
                .unwrap()
                .last_insert_rowid()
        };
        (db, id)
    }

    async fn folder_count(conn: &mut SqliteConnection) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM folder")
            .fetch_one(&mut *conn)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_path_is_idempotent() {
        let (db, lib) = with_library().await;
        let mut conn = db.acquire().await.unwrap();

        let first = resolve_path(&mut conn, lib, "System/Resource/Tests")
            .await
            .unwrap();
        let count = folder_count(&mut conn).await;
        let second = resolve_path(&mut conn, lib, "System/Resource/Tests")
            .await
            .unwrap();

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(count, 3);
        assert_eq!(folder_count(&mut conn).await, 3);
    }

    #[tokio::test]
    async fn test_leading_slash_is_ignored() {
        let (db, lib) = with_library().await;
        let mut conn = db.acquire().await.unwrap();

        let plain = resolve_path(&mut conn, lib, "User").await.unwrap();
        let slashed = resolve_path(&mut conn, lib, "/User").await.unwrap();
        assert_eq!(plain, slashed);
        assert_eq!(resolve_path(&mut conn, lib, "/").await.unwrap(), None);
        assert_eq!(resolve_path(&mut conn, lib, "").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_path_of_matches_recursive_query() {
        let (db, lib) = with_library().await;
        let mut conn = db.acquire().await.unwrap();

        let id = resolve_path(&mut conn, lib, "/System/Resource/Tests")
            .await
            .unwrap();
        let walked = path_of(&mut conn, id).await.unwrap();
        let recursive = path_of_recursive(&mut conn, id).await.unwrap();

        assert_eq!(walked, "System/Resource/Tests");
        assert_eq!(walked, recursive);
        assert_eq!(path_of(&mut conn, None).await.unwrap(), "");
        assert_eq!(path_of_recursive(&mut conn, None).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_rename_requires_same_ancestors() {
        let (db, lib) = with_library().await;
        let mut conn = db.acquire().await.unwrap();
        resolve_path(&mut conn, lib, "A/B").await.unwrap();

        let err = rename_path(&mut conn, lib, "A/B", "C/B").await.unwrap_err();
        assert!(matches!(err.wrap(MaterialDbError::Storage), MaterialDbError::Rename(_)));
        let err = rename_path(&mut conn, lib, "A/B", "A/B/C").await.unwrap_err();
        assert!(matches!(err.wrap(MaterialDbError::Storage), MaterialDbError::Rename(_)));
        let err = rename_path(&mut conn, lib, "X/B", "X/C").await.unwrap_err();
        assert!(matches!(err.wrap(MaterialDbError::Storage), MaterialDbError::Rename(_)));

        rename_path(&mut conn, lib, "/A/B", "A/Renamed").await.unwrap();
        assert_eq!(
            list_paths(&mut conn, lib).await.unwrap(),
            vec!["A".to_string(), "A/Renamed".to_string()]
        );
    }

    #[tokio::test]
    async fn test_delete_missing_segment_leaves_tree() {
        let (db, lib) = with_library().await;
        let mut conn = db.acquire().await.unwrap();
        resolve_path(&mut conn, lib, "A/B/C").await.unwrap();

        let err = delete_recursive(&mut conn, lib, "A/Missing/C")
            .await
            .unwrap_err();
        assert!(matches!(err.wrap(MaterialDbError::Storage), MaterialDbError::Delete(_)));
        assert_eq!(folder_count(&mut conn).await, 3);

        delete_recursive(&mut conn, lib, "A/B").await.unwrap();
        assert_eq!(list_paths(&mut conn, lib).await.unwrap(), vec!["A".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_segment_is_rejected() {
        let (db, lib) = with_library().await;
        let mut conn = db.acquire().await.unwrap();
        let err = resolve_path(&mut conn, lib, "A//B").await.unwrap_err();
        assert!(matches!(
            err.wrap(MaterialDbError::FolderCreation),
            MaterialDbError::Validation(_)
        ));
    }
}
