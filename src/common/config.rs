// src/common/config.rs
//! Store configuration loaded from environment variables

use std::env;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite://auth_store.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PURGE_INTERVAL_SECS: u64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub reset_db: bool,
    /// `None` disables the periodic purge of expired rows
    pub purge_interval: Option<Duration>,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidNumber {
                    key: "DB_MAX_CONNECTIONS",
                    value: raw,
                })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let reset_db = lookup("RESET_DB")
            .unwrap_or_else(|| "false".to_string())
            .to_lowercase()
            == "true";

        let purge_secs = match lookup("PURGE_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    key: "PURGE_INTERVAL_SECS",
                    value: raw,
                })?,
            None => DEFAULT_PURGE_INTERVAL_SECS,
        };

        Ok(Self {
            database_url,
            max_connections,
            reset_db,
            purge_interval: (purge_secs > 0).then(|| Duration::from_secs(purge_secs)),
        })
    }

    /// Filesystem path of a file-backed SQLite URL, if any
    pub fn sqlite_file_path(&self) -> Option<&str> {
        let path_part = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        let path = path_part.split('?').next().unwrap_or("");
        if path.is_empty() || path.starts_with(':') {
            None
        } else {
            Some(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_url, "sqlite://auth_store.db");
        assert_eq!(config.max_connections, 5);
        assert!(!config.reset_db);
        assert_eq!(config.purge_interval, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_overrides() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite://data/auth.db?mode=rwc"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("RESET_DB", "TRUE"),
            ("PURGE_INTERVAL_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.max_connections, 12);
        assert!(config.reset_db);
        assert_eq!(config.purge_interval, None);
        assert_eq!(config.sqlite_file_path(), Some("data/auth.db"));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));

        assert!(StoreConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(StoreConfig::from_lookup(lookup_from(&[("PURGE_INTERVAL_SECS", "-1")])).is_err());
    }

    #[test]
    fn test_memory_url_has_no_file_path() {
        let config =
            StoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert_eq!(config.sqlite_file_path(), None);

        let config =
            StoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite://:memory:")]))
                .unwrap();
        assert_eq!(config.sqlite_file_path(), None);
    }

    #[test]
    fn test_short_sqlite_url_has_file_path() {
        let config =
            StoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite:data/auth.db")]))
                .unwrap();
        assert_eq!(config.sqlite_file_path(), Some("data/auth.db"));

        let config = StoreConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "sqlite:/var/lib/auth/store.db?mode=rwc",
        )]))
        .unwrap();
        assert_eq!(config.sqlite_file_path(), Some("/var/lib/auth/store.db"));

        let config =
            StoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db/auth")]))
                .unwrap();
        assert_eq!(config.sqlite_file_path(), None);
    }
}
