//! Database connection configuration.

use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::paths::{self, PathError};

pub const ENV_DATABASE_URL: &str = "MATDB_DATABASE_URL";
pub const ENV_MAX_CONNECTIONS: &str = "MATDB_MAX_CONNECTIONS";
pub const ENV_RECONNECT_ATTEMPTS: &str = "MATDB_RECONNECT_ATTEMPTS";
pub const ENV_ACQUIRE_TIMEOUT_SECS: &str = "MATDB_ACQUIRE_TIMEOUT_SECS";

/// Connection attempts before giving up on a stale connection.
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 3;
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// How to reach the database.
///
/// One connection is the default: every operation runs on a single logical
/// handle and callers serialise access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub reconnect_attempts: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 1,
            reconnect_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }

    /// An isolated in-memory database.
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    /// Read `MATDB_*` variables; the URL falls back to the default data file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = match lookup(ENV_DATABASE_URL).filter(|u| !u.trim().is_empty()) {
            Some(url) => url,
            None => paths::default_database_url()?,
        };

        let mut config = Self::new(url);
        if let Some(n) = parse_var(&lookup, ENV_MAX_CONNECTIONS)? {
            config.max_connections = n;
        }
        if let Some(n) = parse_var(&lookup, ENV_RECONNECT_ATTEMPTS)? {
            config.reconnect_attempts = n;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, ENV_ACQUIRE_TIMEOUT_SECS)? {
            config.acquire_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub const fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    #[must_use]
    pub const fn with_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.reconnect_attempts = attempts;
        self
    }

    #[must_use]
    pub const fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database url is empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.reconnect_attempts == 0 {
            return Err(ConfigError::Invalid(
                "reconnect_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidValue { name, value })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::new("sqlite:test.db");
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.reconnect_attempts, 3);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = DatabaseConfig::from_lookup(lookup(&[
            (ENV_DATABASE_URL, "sqlite::memory:"),
            (ENV_MAX_CONNECTIONS, "4"),
            (ENV_RECONNECT_ATTEMPTS, "5"),
            (ENV_ACQUIRE_TIMEOUT_SECS, "2"),
        ]))
        .unwrap();

        assert_eq!(config.url, "sqlite::memory:");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.reconnect_attempts, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = DatabaseConfig::from_lookup(lookup(&[
            (ENV_DATABASE_URL, "sqlite::memory:"),
            (ENV_MAX_CONNECTIONS, "many"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: ENV_MAX_CONNECTIONS,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = DatabaseConfig::in_memory().with_reconnect_attempts(0);
        assert!(config.validate().is_err());
        assert!(DatabaseConfig::new("").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_connections() {
        let config = DatabaseConfig::in_memory().with_max_connections(0);
        assert!(config.validate().is_err());
        assert!(
            DatabaseConfig::in_memory()
                .with_max_connections(4)
                .validate()
                .is_ok()
        );
    }
}
