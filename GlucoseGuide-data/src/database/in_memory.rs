use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::{entry_size, BlobStore, StoreError};

/// In-memory blob store
///
/// Clones share the same underlying map, so a repository and a migrator built
/// from clones of one store see each other's writes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlobStore {
    /// Stored blobs keyed by name
    entries: Arc<Mutex<HashMap<String, String>>>,

    /// Optional byte limit over all keys and values
    quota_bytes: Option<usize>,
}

impl InMemoryBlobStore {
    /// Create a new, unbounded in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of keys plus values to `quota_bytes`
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = Some(quota_bytes);
        self
    }

    /// Number of stored keys
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries.lock()?.len())
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.entries.lock()?.is_empty())
    }
}

impl BlobStore for InMemoryBlobStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock()?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock()?;

        if let Some(limit) = self.quota_bytes {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let needed = used + entry_size(key, value);
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        debug!("Storing {} bytes under '{}' in memory", value.len(), key);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock()?.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.entries.lock()?.clear();
        Ok(())
    }
}
