//! CLI-specific error types and mappings.
//!
//! Maps `MaterialDbError` to exit codes and user-facing messages.

use matdb_core::{ConfigError, MaterialDbError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The named library, model or material does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Argument or input validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Writes into a read-only library.
    #[error("{0}")]
    ReadOnly(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The database could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other storage failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl CliError {
    /// Map error to an exit code following sysexits.h.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 64,  // EX_USAGE
            Self::NotFound(_) => 66,   // EX_NOINPUT
            Self::Connection(_) => 69, // EX_UNAVAILABLE
            Self::Database(_) => 73,   // EX_CANTCREAT
            Self::Io(_) => 74,         // EX_IOERR
            Self::ReadOnly(_) => 77,   // EX_NOPERM
            Self::Config(_) => 78,     // EX_CONFIG
        }
    }
}

impl From<MaterialDbError> for CliError {
    fn from(err: MaterialDbError) -> Self {
        let message = err.to_string();
        match err {
            e if e.is_not_found() => Self::NotFound(message),
            e if e.is_read_only() => Self::ReadOnly(message),
            MaterialDbError::Connection(_) => Self::Connection(message),
            MaterialDbError::Validation(_)
            | MaterialDbError::InvalidValue { .. }
            | MaterialDbError::InheritanceCycle { .. } => Self::Arguments(message),
            _ => Self::Database(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Arguments(format!("malformed JSON: {err}"))
    }
}

/// Exit code for an error returned by a handler.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    if let Some(db) = err.downcast_ref::<MaterialDbError>() {
        return CliError::from(db.clone()).exit_code();
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_exit_codes() {
        let not_found: CliError = MaterialDbError::ModelNotFound("x".into()).into();
        assert_eq!(not_found.exit_code(), 66);

        let read_only: CliError = MaterialDbError::LibraryReadOnly("System".into()).into();
        assert_eq!(read_only.exit_code(), 77);

        let cycle: CliError = MaterialDbError::InheritanceCycle {
            model: "a".into(),
            parent: "b".into(),
        }
        .into();
        assert_eq!(cycle.exit_code(), 64);

        let other: CliError = MaterialDbError::Delete("constraint".into()).into();
        assert_eq!(other.exit_code(), 73);
        assert_eq!(other.to_string(), "Database error: Delete failed: constraint");
    }

    #[test]
    fn test_exit_code_through_anyhow() {
        let err = anyhow::Error::new(MaterialDbError::Connection("gone".into()));
        assert_eq!(exit_code_for(&err), 69);

        let err = anyhow::Error::new(CliError::Config("bad".into()));
        assert_eq!(exit_code_for(&err), 78);

        assert_eq!(exit_code_for(&anyhow::anyhow!("plain")), 1);
    }
}
