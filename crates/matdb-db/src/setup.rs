//! Schema provisioning.
//!
//! This module creates and drops the relational table set and the
//! `folder_path` view, and creates or recreates the database file itself.
//! Entry points call [`setup_database()`] with the resolved configuration.

use anyhow::Result;
use sqlx::migrate::MigrateDatabase;
use sqlx::{Executor, Sqlite};
use tracing::{debug, info, warn};

use matdb_core::{DatabaseConfig, MaterialDbError};

use crate::connection::{Database, database_file, is_in_memory};

/// Table DDL in creation order. Dropped in reverse.
const TABLES: &[(&str, &str)] = &[
    (
        "library",
        r"
        CREATE TABLE IF NOT EXISTS library (
            library_id INTEGER PRIMARY KEY AUTOINCREMENT,
            library_name TEXT NOT NULL UNIQUE,
            library_icon BLOB,
            library_read_only INTEGER NOT NULL DEFAULT 0
        )
        ",
    ),
    (
        "folder",
        r"
        CREATE TABLE IF NOT EXISTS folder (
            folder_id INTEGER PRIMARY KEY AUTOINCREMENT,
            folder_name TEXT NOT NULL,
            library_id INTEGER NOT NULL,
            parent_id INTEGER,
            FOREIGN KEY (library_id) REFERENCES library(library_id) ON DELETE CASCADE,
            FOREIGN KEY (parent_id) REFERENCES folder(folder_id) ON DELETE CASCADE
        )
        ",
    ),
    (
        "model",
        r"
        CREATE TABLE IF NOT EXISTS model (
            model_id TEXT PRIMARY KEY NOT NULL,
            library_id INTEGER NOT NULL,
            folder_id INTEGER,
            model_type TEXT NOT NULL CHECK (model_type IN ('Physical', 'Appearance')),
            model_name TEXT NOT NULL,
            model_url TEXT,
            model_description TEXT,
            model_doi TEXT,
            FOREIGN KEY (library_id) REFERENCES library(library_id) ON DELETE CASCADE,
            FOREIGN KEY (folder_id) REFERENCES folder(folder_id) ON DELETE CASCADE
        )
        ",
    ),
    (
        // inherits_id uses the default NO ACTION: checked at statement end,
        // so a cascading library delete may remove both ends of an edge.
        "model_inheritance",
        r"
        CREATE TABLE IF NOT EXISTS model_inheritance (
            model_inheritance_id INTEGER PRIMARY KEY AUTOINCREMENT,
            model_id TEXT NOT NULL,
            inherits_id TEXT NOT NULL,
            UNIQUE (model_id, inherits_id),
            FOREIGN KEY (model_id) REFERENCES model(model_id) ON DELETE CASCADE,
            FOREIGN KEY (inherits_id) REFERENCES model(model_id)
        )
        ",
    ),
    (
        "model_property",
        r"
        CREATE TABLE IF NOT EXISTS model_property (
            model_property_id INTEGER PRIMARY KEY AUTOINCREMENT,
            model_id TEXT NOT NULL,
            model_property_name TEXT NOT NULL,
            model_property_display_name TEXT NOT NULL,
            model_property_type TEXT NOT NULL,
            model_property_units TEXT NOT NULL DEFAULT '',
            model_property_url TEXT NOT NULL DEFAULT '',
            model_property_description TEXT,
            UNIQUE (model_id, model_property_name),
            FOREIGN KEY (model_id) REFERENCES model(model_id) ON DELETE CASCADE
        )
        ",
    ),
    (
        "model_property_column",
        r"
        CREATE TABLE IF NOT EXISTS model_property_column (
            model_property_column_id INTEGER PRIMARY KEY AUTOINCREMENT,
            model_property_id INTEGER NOT NULL,
            model_property_name TEXT NOT NULL,
            model_property_display_name TEXT NOT NULL,
            model_property_type TEXT NOT NULL,
            model_property_units TEXT NOT NULL DEFAULT '',
            model_property_url TEXT NOT NULL DEFAULT '',
            model_property_description TEXT,
            FOREIGN KEY (model_property_id) REFERENCES model_property(model_property_id)
                ON DELETE CASCADE
        )
        ",
    ),
    (
        "material",
        r"
        CREATE TABLE IF NOT EXISTS material (
            material_id TEXT PRIMARY KEY NOT NULL,
            library_id INTEGER NOT NULL,
            folder_id INTEGER,
            material_name TEXT NOT NULL,
            material_author TEXT,
            material_license TEXT,
            material_parent_uuid TEXT,
            material_description TEXT,
            material_url TEXT,
            material_reference TEXT,
            FOREIGN KEY (library_id) REFERENCES library(library_id) ON DELETE CASCADE,
            FOREIGN KEY (folder_id) REFERENCES folder(folder_id) ON DELETE CASCADE,
            FOREIGN KEY (material_parent_uuid) REFERENCES material(material_id)
        )
        ",
    ),
    (
        "material_tag",
        r"
        CREATE TABLE IF NOT EXISTS material_tag (
            material_tag_id INTEGER PRIMARY KEY AUTOINCREMENT,
            material_tag_name TEXT NOT NULL UNIQUE
        )
        ",
    ),
    (
        "material_tag_mapping",
        r"
        CREATE TABLE IF NOT EXISTS material_tag_mapping (
            material_id TEXT NOT NULL,
            material_tag_id INTEGER NOT NULL,
            PRIMARY KEY (material_id, material_tag_id),
            FOREIGN KEY (material_id) REFERENCES material(material_id) ON DELETE CASCADE,
            FOREIGN KEY (material_tag_id) REFERENCES material_tag(material_tag_id)
                ON DELETE CASCADE
        )
        ",
    ),
    (
        "material_models",
        r"
        CREATE TABLE IF NOT EXISTS material_models (
            material_id TEXT NOT NULL,
            model_id TEXT NOT NULL,
            PRIMARY KEY (material_id, model_id),
            FOREIGN KEY (material_id) REFERENCES material(material_id) ON DELETE CASCADE,
            FOREIGN KEY (model_id) REFERENCES model(model_id) ON DELETE CASCADE
        )
        ",
    ),
    (
        "material_property_value",
        r"
        CREATE TABLE IF NOT EXISTS material_property_value (
            material_property_value_id INTEGER PRIMARY KEY AUTOINCREMENT,
            material_id TEXT NOT NULL,
            material_property_name TEXT NOT NULL,
            material_property_type TEXT NOT NULL,
            UNIQUE (material_id, material_property_name),
            FOREIGN KEY (material_id) REFERENCES material(material_id) ON DELETE CASCADE
        )
        ",
    ),
    (
        "material_property_string_value",
        r"
        CREATE TABLE IF NOT EXISTS material_property_string_value (
            material_property_string_value_id INTEGER PRIMARY KEY AUTOINCREMENT,
            material_property_value_id INTEGER NOT NULL,
            material_property_value TEXT NOT NULL,
            FOREIGN KEY (material_property_value_id)
                REFERENCES material_property_value(material_property_value_id) ON DELETE CASCADE
        )
        ",
    ),
    (
        "material_property_long_string_value",
        r"
        CREATE TABLE IF NOT EXISTS material_property_long_string_value (
            material_property_long_string_value_id INTEGER PRIMARY KEY AUTOINCREMENT,
            material_property_value_id INTEGER NOT NULL,
            material_property_value TEXT NOT NULL,
            FOREIGN KEY (material_property_value_id)
                REFERENCES material_property_value(material_property_value_id) ON DELETE CASCADE
        )
        ",
    ),
    (
        "material_property_array_description",
        r"
        CREATE TABLE IF NOT EXISTS material_property_array_description (
            material_property_value_id INTEGER PRIMARY KEY NOT NULL,
            material_property_rows INTEGER NOT NULL,
            material_property_columns INTEGER NOT NULL,
            material_property_depth INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (material_property_value_id)
                REFERENCES material_property_value(material_property_value_id) ON DELETE CASCADE
        )
        ",
    ),
    (
        "material_property_array_value",
        r"
        CREATE TABLE IF NOT EXISTS material_property_array_value (
            material_property_array_value_id INTEGER PRIMARY KEY AUTOINCREMENT,
            material_property_value_id INTEGER NOT NULL,
            material_property_depth INTEGER NOT NULL DEFAULT 0,
            material_property_depth_rows INTEGER NOT NULL DEFAULT 0,
            material_property_row INTEGER NOT NULL,
            material_property_column INTEGER NOT NULL,
            material_property_value TEXT NOT NULL,
            FOREIGN KEY (material_property_value_id)
                REFERENCES material_property_value(material_property_value_id) ON DELETE CASCADE
        )
        ",
    ),
];

/// Indexes and triggers, created after every table exists.
const CONSTRAINTS: &[&str] = &[
    // NULL parents compare distinct, so root folders need their own index.
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_folder_root_name
        ON folder(library_id, folder_name) WHERE parent_id IS NULL",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_folder_child_name
        ON folder(parent_id, folder_name) WHERE parent_id IS NOT NULL",
    "CREATE INDEX IF NOT EXISTS idx_model_library ON model(library_id)",
    "CREATE INDEX IF NOT EXISTS idx_material_library ON material(library_id)",
    "CREATE INDEX IF NOT EXISTS idx_model_inheritance_parent ON model_inheritance(inherits_id)",
    "CREATE INDEX IF NOT EXISTS idx_string_value ON material_property_string_value(material_property_value_id)",
    "CREATE INDEX IF NOT EXISTS idx_long_string_value ON material_property_long_string_value(material_property_value_id)",
    "CREATE INDEX IF NOT EXISTS idx_array_value ON material_property_array_value(material_property_value_id)",
    r"
    CREATE TRIGGER IF NOT EXISTS folder_parent_same_library_insert
    BEFORE INSERT ON folder
    WHEN NEW.parent_id IS NOT NULL
        AND (SELECT library_id FROM folder WHERE folder_id = NEW.parent_id) IS NOT NEW.library_id
    BEGIN
        SELECT RAISE(ABORT, 'folder parent belongs to a different library');
    END
    ",
    r"
    CREATE TRIGGER IF NOT EXISTS folder_parent_same_library_update
    BEFORE UPDATE OF parent_id, library_id ON folder
    WHEN NEW.parent_id IS NOT NULL
        AND (SELECT library_id FROM folder WHERE folder_id = NEW.parent_id) IS NOT NEW.library_id
    BEGIN
        SELECT RAISE(ABORT, 'folder parent belongs to a different library');
    END
    ",
];

/// Materialised folder paths, the same format as `folders::path_of`.
const FOLDER_PATH_VIEW: &str = r"
    CREATE VIEW IF NOT EXISTS folder_path (folder_id, library_id, path) AS
    WITH RECURSIVE walk (folder_id, library_id, path) AS (
        SELECT folder_id, library_id, folder_name
        FROM folder
        WHERE parent_id IS NULL
        UNION ALL
        SELECT f.folder_id, f.library_id, walk.path || '/' || f.folder_name
        FROM folder f
        JOIN walk ON f.parent_id = walk.folder_id
    )
    SELECT folder_id, library_id, path FROM walk
";

fn schema_error(e: sqlx::Error) -> MaterialDbError {
    MaterialDbError::Schema(e.to_string())
}

/// Create every table, index and trigger. Safe to call repeatedly.
pub async fn create_tables(db: &Database) -> Result<(), MaterialDbError> {
    let mut conn = db.acquire().await?;
    for (name, ddl) in TABLES {
        debug!(table = name, "Creating table");
        conn.execute(*ddl).await.map_err(schema_error)?;
    }
    for ddl in CONSTRAINTS {
        conn.execute(*ddl).await.map_err(schema_error)?;
    }
    info!(tables = TABLES.len(), "Schema created");
    Ok(())
}

/// Drop every known table.
///
/// Foreign-key enforcement is switched off on one held connection for the
/// drop loop and restored whether or not the loop succeeds.
pub async fn drop_tables(db: &Database) -> Result<(), MaterialDbError> {
    drop_routines(db).await?;

    let mut conn = db.acquire().await?;
    conn.execute("PRAGMA foreign_keys = OFF")
        .await
        .map_err(schema_error)?;

    let mut outcome = Ok(());
    for (name, _) in TABLES.iter().rev() {
        let sql = format!("DROP TABLE IF EXISTS {name}");
        if let Err(e) = conn.execute(sql.as_str()).await {
            outcome = Err(schema_error(e));
            break;
        }
    }

    let restored = conn.execute("PRAGMA foreign_keys = ON").await;
    outcome?;
    restored.map_err(schema_error)?;

    info!("Schema dropped");
    Ok(())
}

/// Create the `folder_path` view.
pub async fn create_routines(db: &Database) -> Result<(), MaterialDbError> {
    let mut conn = db.acquire().await?;
    conn.execute(FOLDER_PATH_VIEW).await.map_err(schema_error)?;
    debug!("folder_path view created");
    Ok(())
}

pub async fn drop_routines(db: &Database) -> Result<(), MaterialDbError> {
    let mut conn = db.acquire().await?;
    conn.execute("DROP VIEW IF EXISTS folder_path")
        .await
        .map_err(schema_error)?;
    Ok(())
}

/// Whether the database behind `url` exists. In-memory databases always do.
pub async fn database_exists(url: &str) -> Result<bool, MaterialDbError> {
    if is_in_memory(url) {
        return Ok(true);
    }
    Sqlite::database_exists(url)
        .await
        .map_err(|e| MaterialDbError::Connection(e.to_string()))
}

/// Drop and recreate the database at `url`. Destructive.
///
/// # Errors
///
/// - `DatabaseCreation` if `url` names no database file, or the file cannot
///   be removed or created
pub async fn create_database(url: &str) -> Result<(), MaterialDbError> {
    if is_in_memory(url) {
        debug!(url, "In-memory database, nothing to create");
        return Ok(());
    }
    if database_file(url).is_none() {
        return Err(MaterialDbError::DatabaseCreation(
            "database name is empty".to_string(),
        ));
    }

    let creation = |e: sqlx::Error| MaterialDbError::DatabaseCreation(e.to_string());
    if Sqlite::database_exists(url).await.map_err(creation)? {
        warn!(url, "Dropping existing database");
        Sqlite::drop_database(url).await.map_err(creation)?;
    }
    Sqlite::create_database(url).await.map_err(creation)?;

    info!(url, "Database created");
    Ok(())
}

/// Sets up the database connection and ensures the schema exists.
///
/// This function:
/// 1. Creates the parent directory of the database file if needed
/// 2. Prepares the lazily connected [`Database`]
/// 3. Creates all tables, indexes and the `folder_path` view
///
/// # Example
///
/// ```rust,no_run
/// use matdb_core::DatabaseConfig;
/// use matdb_db::setup_database;
///
/// # async fn example() -> anyhow::Result<()> {
/// let db = setup_database(&DatabaseConfig::from_env()?).await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(config: &DatabaseConfig) -> Result<Database> {
    if let Some(parent) = database_file(&config.url)
        .as_deref()
        .and_then(std::path::Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::new(config.clone())?;
    create_tables(&db).await?;
    create_routines(&db).await?;
    Ok(db)
}

/// Sets up an in-memory database for testing.
///
/// Creates a fresh in-memory database with the full production schema.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<Database> {
    setup_database(&DatabaseConfig::in_memory()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_count(db: &Database) -> i64 {
        let mut conn = db.acquire().await.unwrap();
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_one(&mut *conn)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_setup_test_database() {
        let db = setup_test_database().await.unwrap();
        assert_eq!(table_count(&db).await, TABLES.len() as i64);
    }

    #[tokio::test]
    async fn test_create_tables_is_repeatable() {
        let db = setup_test_database().await.unwrap();
        create_tables(&db).await.unwrap();
        create_routines(&db).await.unwrap();
        assert_eq!(table_count(&db).await, TABLES.len() as i64);
    }

    #[tokio::test]
    async fn test_drop_tables_restores_foreign_keys() {
        let db = setup_test_database().await.unwrap();
        drop_tables(&db).await.unwrap();
        assert_eq!(table_count(&db).await, 0);

        let mut conn = db.acquire().await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_create_database_rejects_empty_name() {
        let err = create_database("sqlite:").await.unwrap_err();
        assert!(matches!(err, MaterialDbError::DatabaseCreation(_)));
    }
}
