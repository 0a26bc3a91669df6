//! Key-value persistence facade.
//!
//! A [`KeyValueStore`] is a raw string store (in memory or on disk). The
//! [`StorageFacade`] sits on top of it and is what every service talks to: it
//! (de)serializes JSON and swallows backend failures, logging them and returning
//! `None`/`false` instead. Callers treat a missing value as an empty collection.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::StorageError;

pub mod file;
pub mod images;
pub mod memory;
pub mod migration;

pub use file::FileStore;
pub use images::ImageStore;
pub use memory::MemoryStore;
pub use migration::{migrate_legacy_keys, MigrationReport};

/// Raw string storage backend.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

#[derive(Clone)]
pub struct StorageFacade {
    backend: Arc<dyn KeyValueStore>,
}

impl StorageFacade {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        StorageFacade { backend }
    }

    pub fn in_memory() -> Self {
        StorageFacade::new(Arc::new(MemoryStore::new()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("Failed to read storage key {}: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Corrupt JSON under storage key {}: {}", key, e);
                None
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Failed to serialize value for storage key {}: {}", key, e);
                return false;
            }
        };

        match self.backend.set(key, &raw) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to write storage key {}: {}", key, e);
                false
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        self.backend
            .remove(key)
            .map_err(|e| tracing::error!("Failed to remove storage key {}: {}", key, e))
            .is_ok()
    }

    pub fn clear(&self) -> bool {
        self.backend
            .clear()
            .map_err(|e| tracing::error!("Failed to clear storage: {}", e))
            .is_ok()
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(self.backend.get(key), Ok(Some(_)))
    }

    /// Reads a collection, treating absence (or an unreadable value) as empty.
    pub fn get_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.get(key).unwrap_or_default()
    }

    pub(crate) fn get_raw(&self, key: &str) -> Option<String> {
        self.backend
            .get(key)
            .map_err(|e| tracing::error!("Failed to read storage key {}: {}", key, e))
            .ok()
            .flatten()
    }

    pub(crate) fn set_raw(&self, key: &str, raw: &str) -> bool {
        self.backend
            .set(key, raw)
            .map_err(|e| tracing::error!("Failed to write storage key {}: {}", key, e))
            .is_ok()
    }
}
