//! InSync Storage - persisted string slots
//!
//! The editor keeps two pieces of state outside of any session:
//! - the local draft of the scenario being edited
//! - the marker naming the project the user last selected
//!
//! Both live behind [`KeyValueStorage`], a synchronous `get`/`set`/`remove`
//! capability injected into the editor. [`MemoryStorage`] backs tests and
//! throwaway sessions; [`FileStorage`] persists slots across runs.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod file;
pub mod memory;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::sync::Arc;

/// Slot holding the serialized web steps of the scenario being edited
pub const DRAFT_KEY: &str = "jsonGeneratorWorkspace";

/// Slot holding the most recently selected project identifier
pub const SELECTED_PROJECT_KEY: &str = "selectedProjectId";

/// String-keyed persisted slots
pub trait KeyValueStorage: Send + Sync {
    /// Read slot `key`
    ///
    /// # Errors
    /// Backend-specific read failure
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite slot `key`
    ///
    /// # Errors
    /// Backend-specific write failure
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Clear slot `key`; clearing an empty slot is not an error
    ///
    /// # Errors
    /// Backend-specific write failure
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
