//! In-memory slot storage

use crate::error::StorageError;
use crate::KeyValueStorage;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Process-local storage; contents vanish with the value
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with `entries`
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Snapshot of all slots
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner.lock().clone()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.lock().remove(key);
        Ok(())
    }
}
