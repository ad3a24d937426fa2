use std::sync::Arc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::database::{BlobStore, InMemoryBlobStore, StoreError};

/// JSON adapter over a blob store
///
/// Every failure is logged and reported through the return value; nothing
/// here propagates an error or panics. Callers treat a failed load exactly
/// like a first run with no data.
#[derive(Debug, Clone)]
pub struct StorageService {
    backend: Arc<dyn BlobStore>,
}

impl StorageService {
    /// Wrap a shared blob store
    pub fn new(backend: Arc<dyn BlobStore>) -> Self {
        Self { backend }
    }

    /// Adapter over a fresh, unbounded in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBlobStore::new()))
    }

    /// The wrapped blob store
    pub fn backend(&self) -> &Arc<dyn BlobStore> {
        &self.backend
    }

    /// Serialize `data` as JSON and store it under `key`
    ///
    /// Returns false on serialization failure or when the backend rejects the
    /// write (quota exceeded included).
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> bool {
        let serialized = match serde_json::to_string(data) {
            Ok(serialized) => serialized,
            Err(e) => {
                error!("Failed to serialize data for '{}': {}", key, e);
                return false;
            }
        };

        self.save_raw(key, &serialized)
    }

    /// Store `text` under `key` verbatim
    pub fn save_raw(&self, key: &str, text: &str) -> bool {
        match self.backend.set(key, text) {
            Ok(()) => true,
            Err(StoreError::QuotaExceeded { needed, limit, .. }) => {
                error!(
                    "{} storage quota exceeded writing '{}' ({} of {} bytes)",
                    self.backend.backend_name(),
                    key,
                    needed,
                    limit
                );
                false
            }
            Err(e) => {
                error!("Failed to write '{}' to {} storage: {}", key, self.backend.backend_name(), e);
                false
            }
        }
    }

    /// Load and deserialize the JSON stored under `key`
    ///
    /// Text that is not valid JSON is removed from the store. Valid JSON that
    /// does not fit `T` is left in place.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let serialized = self.load_raw(key)?;

        let value: serde_json::Value = match serde_json::from_str(&serialized) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse stored data under '{}', discarding it: {}", key, e);
                self.remove(key);
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Stored data under '{}' has an unexpected shape: {}", key, e);
                None
            }
        }
    }

    /// Read the text stored under `key` verbatim
    pub fn load_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to read '{}' from {} storage: {}", key, self.backend.backend_name(), e);
                None
            }
        }
    }

    /// Remove `key` from the store
    pub fn remove(&self, key: &str) {
        debug!("Removing '{}' from storage", key);
        if let Err(e) = self.backend.remove(key) {
            error!("Failed to remove '{}': {}", key, e);
        }
    }

    /// Remove every key from the store
    pub fn clear(&self) {
        debug!("Clearing {} storage", self.backend.backend_name());
        if let Err(e) = self.backend.clear() {
            error!("Failed to clear storage: {}", e);
        }
    }
}
