//! SQLite-backed blob store.
//!
//! One row per key in `kv_store`. Connections come from an r2d2 pool so that
//! cloned handles can be shared between the repository and the migrator.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OpenFlags, OptionalExtension};
use tracing::{debug, info};

use super::migrations::run_sqlite_migrations;
use super::{entry_size, BlobStore, StoreError};

/// Location string for a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Blob store persisted in a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteBlobStore {
    pool: Arc<r2d2::Pool<SqliteConnectionManager>>,
    quota_bytes: Option<usize>,
    location: String,
}

impl SqliteBlobStore {
    /// Open (or create) the database at `path` and run schema migrations
    pub fn open(path: &str, pool_size: u32, timeout: Duration) -> Result<Self, StoreError> {
        if path == IN_MEMORY {
            return Self::open_in_memory();
        }

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating parent directory: {:?}", parent);
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Config(format!("Failed to create directory {:?}: {}", parent, e))
                })?;
            }
        }

        info!("Opening SQLite blob store at: {}", path);
        let manager = SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

        let pool = r2d2::Pool::builder()
            .max_size(pool_size.max(1))
            .connection_timeout(timeout)
            .build(manager)?;

        Self::init(pool, path.to_string())
    }

    /// Open a private in-memory database
    ///
    /// The pool holds exactly one connection that is never recycled, since
    /// every SQLite in-memory connection is its own database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        info!("Opening in-memory SQLite blob store");
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(SqliteConnectionManager::memory())?;

        Self::init(pool, IN_MEMORY.to_string())
    }

    fn init(pool: r2d2::Pool<SqliteConnectionManager>, location: String) -> Result<Self, StoreError> {
        let conn = pool.get()?;
        run_sqlite_migrations(&conn)?;
        drop(conn);

        Ok(Self {
            pool: Arc::new(pool),
            quota_bytes: None,
            location,
        })
    }

    /// Limit the total size of keys plus values to `quota_bytes`
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Path of the database file, or `:memory:`
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl BlobStore for SqliteBlobStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.pool.get()?;
        let value = conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.pool.get()?;

        if let Some(limit) = self.quota_bytes {
            let used: i64 = conn.query_row(
                "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
                 FROM kv_store WHERE key != ?1",
                params![key],
                |row| row.get(0),
            )?;
            let needed = used.max(0) as usize + entry_size(key, value);
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        debug!("Storing {} bytes under '{}' in SQLite", value.len(), key);
        conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM kv_store", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_overwrite() {
        let store = SqliteBlobStore::open_in_memory().unwrap();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("bloodSugarData", "[]").unwrap();
        assert_eq!(store.get("bloodSugarData").unwrap().as_deref(), Some("[]"));

        store.set("bloodSugarData", "[1]").unwrap();
        assert_eq!(store.get("bloodSugarData").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_remove_and_clear() {
        let store = SqliteBlobStore::open_in_memory().unwrap();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));

        store.clear().unwrap();
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_clones_share_database() {
        let store = SqliteBlobStore::open_in_memory().unwrap();
        let other = store.clone();
        store.set("shared", "yes").unwrap();
        assert_eq!(other.get("shared").unwrap().as_deref(), Some("yes"));
        assert_eq!(other.location(), IN_MEMORY);
    }

    #[test]
    fn test_quota_is_enforced() {
        let store = SqliteBlobStore::open_in_memory().unwrap().with_quota(8);
        store.set("k", "1234").unwrap();

        let err = store.set("k2", "12345").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(store.get("k2").unwrap(), None);
    }

    #[test]
    fn test_file_backed_store_persists_across_opens() {
        let dir = std::env::temp_dir().join(format!("glucose_guide_{}", uuid::Uuid::new_v4()));
        let path = dir.join("store.db");
        let path = path.to_string_lossy().to_string();

        {
            let store = SqliteBlobStore::open(&path, 2, Duration::from_secs(5)).unwrap();
            store.set("bloodSugarData", "[]").unwrap();
        }

        let reopened = SqliteBlobStore::open(&path, 2, Duration::from_secs(5)).unwrap();
        assert_eq!(reopened.get("bloodSugarData").unwrap().as_deref(), Some("[]"));

        let _ = std::fs::remove_dir_all(dir);
    }
}
