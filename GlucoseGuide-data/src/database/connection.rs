//! Store configuration and construction for the GlucoseGuide application
//!
//! Supported backends:
//! - SQLite (default, behind the `sqlite` feature)
//! - In-memory (tests and ephemeral sessions)

use std::env;
use std::str::FromStr;
use std::sync::Arc;
#[cfg(feature = "sqlite")]
use std::time::Duration;
use tracing::info;

use super::{BlobStore, InMemoryBlobStore, StoreError};

/// Default SQLite database location
pub const DEFAULT_SQLITE_PATH: &str = "data/glucose_guide.db";

/// Supported store types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// Process-local map, lost on exit
    Memory,
    /// SQLite database file
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl FromStr for StoreType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreType::Memory),
            #[cfg(feature = "sqlite")]
            "sqlite" => Ok(StoreType::Sqlite),
            _ => Err(StoreError::UnsupportedBackend(s.to_string())),
        }
    }
}

impl Default for StoreType {
    fn default() -> Self {
        #[cfg(feature = "sqlite")]
        {
            StoreType::Sqlite
        }
        #[cfg(not(feature = "sqlite"))]
        {
            StoreType::Memory
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backend type (memory, sqlite)
    pub store_type: StoreType,
    /// Path to the SQLite database file
    pub sqlite_path: String,
    /// Optional byte limit over all stored keys and values
    pub quota_bytes: Option<usize>,
    /// Connection pool size for SQLite
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            sqlite_path: DEFAULT_SQLITE_PATH.to_string(),
            quota_bytes: None,
            pool_size: 4,
            timeout_seconds: 30,
        }
    }
}

impl StoreConfig {
    /// Create a store configuration from environment variables
    ///
    /// Reads `GLUCOSE_STORE_TYPE`, `GLUCOSE_SQLITE_PATH`,
    /// `GLUCOSE_STORE_QUOTA_BYTES`, `GLUCOSE_POOL_SIZE` and
    /// `GLUCOSE_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let store_type = match lookup("GLUCOSE_STORE_TYPE") {
            Some(value) => value.parse::<StoreType>()?,
            None => defaults.store_type,
        };

        let sqlite_path = lookup("GLUCOSE_SQLITE_PATH").unwrap_or(defaults.sqlite_path);

        let quota_bytes = match lookup("GLUCOSE_STORE_QUOTA_BYTES") {
            Some(value) => Some(value.trim().parse::<usize>().map_err(|e| {
                StoreError::Config(format!("GLUCOSE_STORE_QUOTA_BYTES '{}': {}", value, e))
            })?),
            None => None,
        };

        let pool_size = lookup("GLUCOSE_POOL_SIZE")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(defaults.pool_size);

        let timeout_seconds = lookup("GLUCOSE_TIMEOUT_SECONDS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(defaults.timeout_seconds);

        info!(
            "Store configuration: type={:?}, quota={:?}, pool_size={}, timeout={}s",
            store_type, quota_bytes, pool_size, timeout_seconds
        );

        Ok(StoreConfig {
            store_type,
            sqlite_path,
            quota_bytes,
            pool_size,
            timeout_seconds,
        })
    }
}

/// Open the blob store described by `config`
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn BlobStore>, StoreError> {
    info!("Opening blob store with type: {:?}", config.store_type);

    let store: Arc<dyn BlobStore> = match config.store_type {
        StoreType::Memory => {
            let store = InMemoryBlobStore::new();
            match config.quota_bytes {
                Some(quota) => Arc::new(store.with_quota(quota)),
                None => Arc::new(store),
            }
        }
        #[cfg(feature = "sqlite")]
        StoreType::Sqlite => {
            let store = super::SqliteBlobStore::open(
                &config.sqlite_path,
                config.pool_size,
                Duration::from_secs(config.timeout_seconds),
            )?;
            match config.quota_bytes {
                Some(quota) => Arc::new(store.with_quota(quota)),
                None => Arc::new(store),
            }
        }
    };

    Ok(store)
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_store_config_default() {
        let config = StoreConfig::default();
        assert_eq!(config.sqlite_path, DEFAULT_SQLITE_PATH);
        assert_eq!(config.quota_bytes, None);
        assert_eq!(config.pool_size, 4);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_store_type_from_str() {
        assert_eq!("memory".parse::<StoreType>().unwrap(), StoreType::Memory);
        assert_eq!("MEMORY".parse::<StoreType>().unwrap(), StoreType::Memory);

        #[cfg(feature = "sqlite")]
        assert_eq!("sqlite".parse::<StoreType>().unwrap(), StoreType::Sqlite);

        assert!("postgres".parse::<StoreType>().is_err());
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("GLUCOSE_STORE_TYPE", "memory"),
            ("GLUCOSE_SQLITE_PATH", "/tmp/glucose.db"),
            ("GLUCOSE_STORE_QUOTA_BYTES", "5242880"),
            ("GLUCOSE_POOL_SIZE", "2"),
            ("GLUCOSE_TIMEOUT_SECONDS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.store_type, StoreType::Memory);
        assert_eq!(config.sqlite_path, "/tmp/glucose.db");
        assert_eq!(config.quota_bytes, Some(5_242_880));
        assert_eq!(config.pool_size, 2);
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn test_from_lookup_rejects_bad_quota() {
        let result = StoreConfig::from_lookup(lookup_from(&[("GLUCOSE_STORE_QUOTA_BYTES", "lots")]));
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[test]
    fn test_from_lookup_rejects_unknown_backend() {
        let result = StoreConfig::from_lookup(lookup_from(&[("GLUCOSE_STORE_TYPE", "mysql")]));
        assert!(matches!(result, Err(StoreError::UnsupportedBackend(_))));
    }

    #[test]
    fn test_open_memory_store_with_quota() {
        let config = StoreConfig {
            store_type: StoreType::Memory,
            quota_bytes: Some(4),
            ..StoreConfig::default()
        };
        let store = open_store(&config).unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert!(store.set("key", "too long").is_err());
    }
}
