use std::sync::PoisonError;
use thiserror::Error;

// Blob store backends
pub mod connection;
pub mod in_memory;
pub mod migrations;
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export store construction and backends
pub use connection::{open_store, StoreConfig, StoreType};
pub use in_memory::InMemoryBlobStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBlobStore;

/// String-keyed persistent blob store
///
/// Values are opaque text. Serialization and failure recovery live one layer
/// up in [`crate::repository::StorageService`].
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Read the text stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key` if present
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Remove every key
    fn clear(&self) -> Result<(), StoreError>;
}

/// Blob store error enum
#[derive(Error, Debug)]
pub enum StoreError {
    /// Write rejected because the store is full
    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),

    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[cfg(feature = "sqlite")]
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Configuration error
    #[error("Store configuration error: {0}")]
    Config(String),

    /// Unsupported store type
    #[error("Unsupported store type: {0}")]
    UnsupportedBackend(String),

    /// Schema migration error
    #[error("Store migration error: {0}")]
    Migration(String),
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(error: PoisonError<T>) -> Self {
        StoreError::Lock(error.to_string())
    }
}

/// Bytes a key/value pair occupies against a quota
pub(crate) fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}
