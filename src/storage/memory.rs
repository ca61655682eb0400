//! In-memory storage backend using `DashMap`.
//!
//! Data is lost when the process exits. Also the fake used by tests.

use super::StorageBackend;
use crate::Result;
use dashmap::DashMap;

/// In-memory key/value storage.
///
/// Thread-safe; uses `DashMap` internally for O(1) average-case operations.
///
/// # Example
///
/// ```rust
/// use trueno_ab::storage::{MemoryStorage, StorageBackend};
///
/// let storage = MemoryStorage::new();
/// storage.set_item("hello", "world")?;
/// assert_eq!(storage.get_item("hello")?.as_deref(), Some("world"));
/// # Ok::<(), trueno_ab::Error>(())
/// ```
#[derive(Debug)]
pub struct MemoryStorage {
    store: DashMap<String, String>,
}

impl MemoryStorage {
    /// Create a new empty in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Get the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.store.clear();
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.store.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        Ok(())
    }

    fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.store.contains_key(key))
    }
}
