//! Persistence for assignments and the conversion debug log
//!
//! Two layers:
//! - [`StorageBackend`]: a string key/value store with the shape of browser
//!   local storage (`MemoryStorage`, `FileStorage`, and `LocalStorage` on wasm).
//! - [`AssignmentRepository`]: the assignment/event contract the service
//!   depends on. [`StorageRepository`] implements it over any backend by
//!   keeping two JSON arrays under two keys.
//!
//! # Example
//!
//! ```rust
//! use trueno_ab::storage::{AssignmentRepository, MemoryStorage, StorageRepository};
//!
//! let repository = StorageRepository::new(MemoryStorage::new());
//! repository.save_assignment("hero-cta", "variant-a");
//!
//! let assignments = repository.get_assignments();
//! assert_eq!(assignments.len(), 1);
//! assert_eq!(assignments[0].variant_id(), "variant-a");
//!
//! repository.clear_all_assignments();
//! assert!(repository.get_assignments().is_empty());
//! ```

mod file;
mod memory;
mod repository;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use repository::{AssignmentRepository, StorageRepository};

use crate::Result;

/// String key/value storage.
///
/// Writes may fail (quota, permissions); reads of a missing key return
/// `Ok(None)`.
pub trait StorageBackend {
    /// Get a value by key.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Set a value for a key, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. No-op if the key doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the delete.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Check if a key exists.
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot be read.
    fn contains_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key)?.is_some())
    }
}

impl<S: StorageBackend + ?Sized> StorageBackend for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

impl<S: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get() {
        let storage = MemoryStorage::new();

        storage.set_item("key1", "value1").unwrap();
        let value = storage.get_item("key1").unwrap();

        assert_eq!(value.as_deref(), Some("value1"));
    }

    #[test]
    fn test_memory_storage_get_nonexistent() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_memory_storage_overwrite() {
        let storage = MemoryStorage::new();

        storage.set_item("key", "value1").unwrap();
        storage.set_item("key", "value2").unwrap();

        assert_eq!(storage.get_item("key").unwrap().as_deref(), Some("value2"));
    }

    #[test]
    fn test_memory_storage_remove() {
        let storage = MemoryStorage::new();

        storage.set_item("key", "value").unwrap();
        storage.remove_item("key").unwrap();

        assert_eq!(storage.get_item("key").unwrap(), None);
        // Removing again should not error
        storage.remove_item("key").unwrap();
    }

    #[test]
    fn test_memory_storage_contains_key() {
        let storage = MemoryStorage::new();

        assert!(!storage.contains_key("key").unwrap());
        storage.set_item("key", "value").unwrap();
        assert!(storage.contains_key("key").unwrap());
    }

    #[test]
    fn test_storage_through_reference_and_arc() {
        let storage = std::sync::Arc::new(MemoryStorage::new());
        let shared = std::sync::Arc::clone(&storage);

        shared.set_item("k", "v").unwrap();
        assert_eq!((&*storage).get_item("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_storage_concurrent_access() {
        use std::sync::Arc;

        let storage = Arc::new(MemoryStorage::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let storage = Arc::clone(&storage);
                std::thread::spawn(move || {
                    storage.set_item(&format!("key{i}"), &format!("value{i}")).unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(storage.len(), 8);
        for i in 0..8 {
            assert_eq!(
                storage.get_item(&format!("key{i}")).unwrap(),
                Some(format!("value{i}"))
            );
        }
    }
}
