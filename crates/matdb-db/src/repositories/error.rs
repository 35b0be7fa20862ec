//! Error plumbing between SQL helpers and the repository facades.

use thiserror::Error;
use tracing::{debug, error};

use matdb_core::MaterialDbError;

use crate::connection::is_stale;

/// Errors raised inside the adapter before they are classified.
#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error(transparent)]
    Driver(#[from] sqlx::Error),

    /// Already classified; passed through unchanged.
    #[error(transparent)]
    Domain(#[from] MaterialDbError),
}

pub(crate) type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Classify into the facade taxonomy.
    ///
    /// Driver errors become `kind(cause)`, or `Connection` when the handle
    /// went stale. Domain errors are returned as they are.
    pub(crate) fn wrap(self, kind: fn(String) -> MaterialDbError) -> MaterialDbError {
        match self {
            Self::Domain(e) => e,
            Self::Driver(e) if is_stale(&e) => MaterialDbError::Connection(e.to_string()),
            Self::Driver(e) => kind(e.to_string()),
        }
    }

    pub(crate) fn storage(message: impl Into<String>) -> Self {
        Self::Domain(MaterialDbError::Storage(message.into()))
    }
}

/// `map_err` adapter that classifies and logs a failed facade call.
pub(crate) fn failed(
    operation: &'static str,
    kind: fn(String) -> MaterialDbError,
) -> impl FnOnce(StoreError) -> MaterialDbError {
    move |e| {
        let err = e.wrap(kind);
        if err.is_classified() {
            debug!(operation, error = %err, "Operation rejected");
        } else {
            error!(operation, error = %err, "Operation failed");
        }
        err
    }
}

/// Convert a stored index or count.
pub(crate) fn to_index(value: i64) -> StoreResult<usize> {
    usize::try_from(value).map_err(|_| StoreError::storage(format!("invalid stored index {value}")))
}

/// Convert an in-memory index or count for storage.
pub(crate) fn to_db(value: usize) -> StoreResult<i64> {
    i64::try_from(value).map_err(|_| StoreError::storage(format!("index {value} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_errors_are_wrapped() {
        let err = StoreError::from(sqlx::Error::RowNotFound).wrap(MaterialDbError::Delete);
        assert!(matches!(err, MaterialDbError::Delete(msg) if msg.contains("no rows")));
    }

    #[test]
    fn test_stale_driver_errors_become_connection() {
        let err = StoreError::from(sqlx::Error::PoolTimedOut).wrap(MaterialDbError::ModelCreation);
        assert!(err.is_connection());
    }

    #[test]
    fn test_classified_errors_pass_through() {
        let err = StoreError::from(MaterialDbError::ModelExists("m".into()))
            .wrap(MaterialDbError::ModelCreation);
        assert_eq!(err, MaterialDbError::ModelExists("m".into()));
    }

    #[test]
    fn test_index_conversion() {
        assert_eq!(to_index(3).unwrap(), 3);
        assert!(to_index(-1).is_err());
        assert_eq!(to_db(7).unwrap(), 7);
    }
}
