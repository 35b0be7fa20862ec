//! Connection management.
//!
//! [`Database`] owns a lazily opened pool. Every logical operation acquires
//! a scoped connection or transaction from it; both go back to the pool on
//! drop, whatever path the caller takes out. Stale-connection failures
//! during acquisition close the pool and retry up to the configured budget.

use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use matdb_core::{DatabaseConfig, MaterialDbError};

/// Errors that indicate the handle itself is unusable rather than the statement.
///
/// `PoolTimedOut` is not one of them: it means every connection is busy,
/// and resetting the pool would drop an in-memory database.
pub(crate) fn is_stale(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::WorkerCrashed
    )
}

/// Whether `url` names an in-memory database.
pub(crate) fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// File behind a `sqlite:` URL, `None` for in-memory databases.
pub(crate) fn database_file(url: &str) -> Option<PathBuf> {
    if is_in_memory(url) {
        return None;
    }
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    let path = rest.split('?').next().unwrap_or_default();
    (!path.is_empty()).then(|| PathBuf::from(path))
}

/// A lazily connected `SQLite` database.
pub struct Database {
    config: DatabaseConfig,
    options: SqliteConnectOptions,
    pool: Mutex<Option<SqlitePool>>,
}

impl Database {
    /// Prepare a database handle. No connection is opened until first use.
    pub fn new(config: DatabaseConfig) -> Result<Self, MaterialDbError> {
        config
            .validate()
            .map_err(|e| MaterialDbError::Connection(e.to_string()))?;

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| MaterialDbError::Connection(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        Ok(Self {
            config,
            options,
            pool: Mutex::new(None),
        })
    }

    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        // Every connection to `:memory:` opens a separate database.
        let max_connections = if is_in_memory(&self.config.url) {
            1
        } else {
            self.config.max_connections
        };
        SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(self.config.acquire_timeout)
            // An in-memory database lives only as long as its connections.
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA encoding = 'UTF-8'")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            // Bulk loads switch enforcement off on their connection.
            .before_acquire(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys = ON")
                        .execute(&mut *conn)
                        .await?;
                    Ok(true)
                })
            })
    }

    /// Establish the pool if needed and return a handle to it. Idempotent.
    pub async fn connect(&self) -> Result<SqlitePool, MaterialDbError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let mut held = self.pool.lock().await;
            if let Some(pool) = held.as_ref().filter(|p| !p.is_closed()) {
                return Ok(pool.clone());
            }

            match self.pool_options().connect_with(self.options.clone()).await {
                Ok(pool) => {
                    debug!(url = %self.config.url, "Database connected");
                    *held = Some(pool.clone());
                    return Ok(pool);
                }
                Err(e) if is_stale(&e) && attempt < self.config.reconnect_attempts => {
                    warn!(attempt, error = %e, "Database connection failed, retrying");
                    *held = None;
                }
                Err(e) => return Err(MaterialDbError::Connection(e.to_string())),
            }
        }
    }

    async fn with_retry<T, F, Fut>(&self, what: &'static str, op: F) -> Result<T, MaterialDbError>
    where
        F: Fn(SqlitePool) -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let pool = self.connect().await?;
            match op(pool).await {
                Ok(value) => return Ok(value),
                Err(e) if is_stale(&e) && attempt < self.config.reconnect_attempts => {
                    warn!(attempt, what, error = %e, "Stale database connection, reconnecting");
                    self.reset().await;
                }
                Err(e) => return Err(MaterialDbError::Connection(e.to_string())),
            }
        }
    }

    /// A scoped connection, returned to the pool on drop.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, MaterialDbError> {
        self.with_retry("acquire", |pool| async move { pool.acquire().await })
            .await
    }

    /// A scoped transaction, rolled back on drop unless committed.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, MaterialDbError> {
        self.with_retry("begin", |pool| async move { pool.begin().await })
            .await
    }

    /// Close and forget the held pool; the next call reconnects.
    async fn reset(&self) {
        if let Some(pool) = self.pool.lock().await.take() {
            pool.close().await;
        }
    }

    pub async fn close(&self) {
        self.reset().await;
        info!(url = %self.config.url, "Database closed");
    }

    pub async fn is_connected(&self) -> bool {
        self.pool
            .lock()
            .await
            .as_ref()
            .is_some_and(|p| !p.is_closed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matdb_core::config::DEFAULT_RECONNECT_ATTEMPTS;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_database_file() {
        assert_eq!(
            database_file("sqlite:/tmp/m.db"),
            Some(PathBuf::from("/tmp/m.db"))
        );
        assert_eq!(
            database_file("sqlite:///tmp/m.db?mode=rwc"),
            Some(PathBuf::from("/tmp/m.db"))
        );
        assert_eq!(database_file("sqlite::memory:"), None);
        assert_eq!(database_file("sqlite:"), None);
    }

    #[test]
    fn test_stale_classification() {
        assert!(is_stale(&sqlx::Error::PoolClosed));
        assert!(is_stale(&sqlx::Error::WorkerCrashed));
        assert!(!is_stale(&sqlx::Error::PoolTimedOut));
        assert!(!is_stale(&sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn test_stale_errors_exhaust_retry_budget() {
        let db = Database::new(DatabaseConfig::in_memory()).unwrap();
        let calls = AtomicU32::new(0);

        let err = db
            .with_retry("test", |_pool| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(sqlx::Error::PoolClosed) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MaterialDbError::Connection(_)));
        assert_eq!(calls.load(Ordering::SeqCst), DEFAULT_RECONNECT_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_stale_error_reconnects_and_succeeds() {
        let db = Database::new(DatabaseConfig::in_memory()).unwrap();
        let calls = AtomicU32::new(0);

        let value: i64 = db
            .with_retry("test", |pool| {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if call == 0 {
                        return Err(sqlx::Error::WorkerCrashed);
                    }
                    sqlx::query_scalar("SELECT 1").fetch_one(&pool).await
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(db.is_connected().await);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let db = Database::new(DatabaseConfig::in_memory()).unwrap();
        let calls = AtomicU32::new(0);

        let err = db
            .with_retry("test", |_pool| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(sqlx::Error::PoolTimedOut) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MaterialDbError::Connection(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_closed_pool_is_reopened() {
        let db = Database::new(DatabaseConfig::in_memory()).unwrap();
        db.connect().await.unwrap().close().await;
        assert!(!db.is_connected().await);

        let mut conn = db.acquire().await.unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(one, 1);
        assert!(db.is_connected().await);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = DatabaseConfig::in_memory().with_reconnect_attempts(0);
        assert!(matches!(
            Database::new(config),
            Err(MaterialDbError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_is_lazy_and_idempotent() {
        let db = Database::new(DatabaseConfig::in_memory()).unwrap();
        assert!(!db.is_connected().await);

        let first = db.connect().await.unwrap();
        let second = db.connect().await.unwrap();
        assert!(db.is_connected().await);
        assert_eq!(first.size(), second.size());

        db.close().await;
        assert!(!db.is_connected().await);
    }

    #[tokio::test]
    async fn test_acquired_connection_has_foreign_keys_on() {
        let db = Database::new(DatabaseConfig::in_memory()).unwrap();
        {
            let mut conn = db.acquire().await.unwrap();
            sqlx::query("PRAGMA foreign_keys = OFF")
                .execute(&mut *conn)
                .await
                .unwrap();
        }
        let mut conn = db.acquire().await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
