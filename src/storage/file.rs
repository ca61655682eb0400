//! File-backed storage: one JSON object of string keys to string values.
//!
//! The native counterpart of browser local storage, one file per profile.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use super::StorageBackend;
use crate::{Error, Result};

/// Persistent key/value storage in a single JSON document.
///
/// Every write rewrites the document (via a sibling temp file and rename).
/// A missing file reads as empty. A corrupt file fails reads, and the next
/// write replaces it with a fresh document.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open storage at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(document)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = match self.read_document() {
            Err(Error::Serialization(e)) => {
                warn!(path = %self.path.display(), error = %e, "Replacing corrupt storage document");
                BTreeMap::new()
            }
            other => other?,
        };
        if f(&mut document) {
            self.write_document(&document)?;
        }
        Ok(())
    }
}

impl StorageBackend for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_document()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.update(|document| {
            document.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.update(|document| document.remove(key).is_some())
    }
}
