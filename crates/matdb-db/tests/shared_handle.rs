//! Several callers sharing one in-memory database handle.

use std::sync::Arc;
use std::time::Duration;

use matdb_core::{DatabaseConfig, LibraryRepository, MaterialDbError};
use matdb_db::{SqliteLibraryRepository, setup_database};
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn busy_pool_does_not_drop_in_memory_data() {
    let config = DatabaseConfig::in_memory().with_acquire_timeout(Duration::from_millis(200));
    let db = Arc::new(setup_database(&config).await.unwrap());
    let libraries = SqliteLibraryRepository::new(Arc::clone(&db));
    libraries.create_library("User", None, false).await.unwrap();

    // The single in-memory connection is checked out while a second caller waits.
    let held = db.acquire().await.unwrap();
    let waiting = SqliteLibraryRepository::new(Arc::clone(&db));
    let err = assert_err!(
        tokio::spawn(async move { waiting.list_libraries().await })
            .await
            .unwrap()
    );
    assert!(matches!(err, MaterialDbError::Connection(_)), "{err:?}");
    drop(held);

    assert!(db.is_connected().await);
    let names: Vec<String> = assert_ok!(libraries.list_libraries().await)
        .into_iter()
        .map(|l| l.name)
        .collect();
    assert_eq!(names, ["User"]);
}

#[tokio::test]
async fn concurrent_callers_both_complete() {
    let db = Arc::new(setup_database(&DatabaseConfig::in_memory()).await.unwrap());
    let libraries = SqliteLibraryRepository::new(Arc::clone(&db));
    libraries.create_library("User", None, false).await.unwrap();

    let first = SqliteLibraryRepository::new(Arc::clone(&db));
    let second = SqliteLibraryRepository::new(Arc::clone(&db));
    let (a, b) = tokio::join!(
        tokio::spawn(async move { first.list_libraries().await }),
        tokio::spawn(async move { second.get_library("User").await }),
    );

    assert_eq!(a.unwrap().unwrap().len(), 1);
    assert_eq!(b.unwrap().unwrap().name, "User");
}
