//! Provisioning a file-backed database.

use matdb_core::{DatabaseConfig, LibraryRepository, MaterialDbError};
use matdb_db::{StoreFactory, create_database, database_exists, setup_database};
use std::sync::Arc;
use tempfile::TempDir;

fn url_in(dir: &TempDir, name: &str) -> String {
    format!("sqlite://{}", dir.path().join(name).display())
}

#[tokio::test]
async fn create_database_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let url = url_in(&dir, "materials.db");

    assert!(!database_exists(&url).await.unwrap());
    create_database(&url).await.unwrap();
    assert!(database_exists(&url).await.unwrap());

    let db = Arc::new(setup_database(&DatabaseConfig::new(url.clone())).await.unwrap());
    StoreFactory::build_manager(&db)
        .libraries()
        .create_library("User", None, false)
        .await
        .unwrap();
    db.close().await;

    create_database(&url).await.unwrap();
    let db = Arc::new(setup_database(&DatabaseConfig::new(url)).await.unwrap());
    let libraries = StoreFactory::build_repos(&db).libraries;
    assert!(libraries.list_libraries().await.unwrap().is_empty());
}

#[tokio::test]
async fn setup_creates_missing_directories_and_persists() {
    let dir = TempDir::new().unwrap();
    let url = url_in(&dir, "nested/deeper/materials.db");

    let db = Arc::new(setup_database(&DatabaseConfig::new(url.clone())).await.unwrap());
    let manager = StoreFactory::build_manager(&db);
    manager
        .libraries()
        .create_library("System", Some(b"icon".as_slice()), true)
        .await
        .unwrap();
    db.close().await;

    // Schema creation is idempotent on an existing file.
    let db = Arc::new(setup_database(&DatabaseConfig::new(url)).await.unwrap());
    let library = StoreFactory::build_manager(&db)
        .libraries()
        .get_library("System")
        .await
        .unwrap();
    assert!(library.read_only);
    assert_eq!(library.icon.as_deref(), Some(b"icon".as_slice()));
}

#[tokio::test]
async fn create_database_needs_a_file_name() {
    let err = create_database("sqlite://").await.unwrap_err();
    assert!(matches!(err, MaterialDbError::DatabaseCreation(_)), "{err:?}");
    // In-memory databases need no provisioning.
    create_database("sqlite::memory:").await.unwrap();
}
