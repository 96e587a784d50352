//! Error types for persisted slots

use std::path::PathBuf;

/// Errors reading or writing persisted slots
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// IO error on the backing file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file is not a JSON object of strings
    #[error("corrupt storage file {path}: {message}")]
    Corrupt { path: PathBuf, message: String },
}

impl StorageError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create corruption error for path
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.into(),
            message: message.into(),
        }
    }
}
