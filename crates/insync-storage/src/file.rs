//! File-backed slot storage
//!
//! Slots live in a single JSON object on disk. Every mutation is written
//! through, so slots survive process restarts the way browser local storage
//! survives page reloads.

use crate::error::StorageError;
use crate::KeyValueStorage;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Storage persisted to a JSON file
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    inner: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// Open storage at `path`, starting empty if the file does not exist
    ///
    /// # Errors
    /// - `StorageError::Io` if the file exists but cannot be read
    /// - `StorageError::Corrupt` if the file is not a JSON object of strings
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let slots = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| StorageError::corrupt(&path, e.to_string()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StorageError::io_error(&path, e)),
        };
        tracing::debug!(path = %path.display(), slots = slots.len(), "opened slot storage");

        Ok(Self {
            path,
            inner: Mutex::new(slots),
        })
    }

    /// Backing file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, slots: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io_error(parent, e))?;
        }
        let raw = serde_json::to_string_pretty(slots)
            .map_err(|e| StorageError::corrupt(&self.path, e.to_string()))?;

        // Readers never observe a partially written file
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(|e| StorageError::io_error(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::io_error(&self.path, e))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.inner.lock();
        let mut next = slots.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *slots = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.inner.lock();
        if !slots.contains_key(key) && self.path.exists() {
            return Ok(());
        }
        let mut next = slots.clone();
        next.remove(key);
        // Memory only changes once the file does
        self.flush(&next)?;
        *slots = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_storage_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slots.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set("selectedProjectId", "P1").unwrap();
        storage.set("jsonGeneratorWorkspace", "{\"a\":1}").unwrap();
        storage.remove("jsonGeneratorWorkspace").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("selectedProjectId").unwrap().as_deref(), Some("P1"));
        assert_eq!(reopened.get("jsonGeneratorWorkspace").unwrap(), None);
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nested/slots.json")).unwrap();
        assert_eq!(storage.get("anything").unwrap(), None);

        storage.set("k", "v").unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn file_storage_failed_write_keeps_previous_slots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slots.json");
        let storage = FileStorage::open(&path).unwrap();
        storage.set("k", "old").unwrap();
        storage.set("draft", "{\"a\":1}").unwrap();

        // A directory where the temp file goes makes every flush fail
        fs::create_dir(path.with_extension("tmp")).unwrap();

        assert!(storage.set("k", "new").is_err());
        assert!(storage.remove("draft").is_err());
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("old"));
        assert_eq!(storage.get("draft").unwrap().as_deref(), Some("{\"a\":1}"));

        let on_disk = FileStorage::open(&path).unwrap();
        assert_eq!(on_disk.get("k").unwrap().as_deref(), Some("old"));
        assert_eq!(on_disk.get("draft").unwrap().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slots.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStorage::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
