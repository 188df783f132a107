//! Store file error types
//!
//! Every failure of the record store is one of these. None of them are
//! fatal: the registry logs them and degrades to an empty result.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store file does not exist yet
    #[error("Store file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Opening or reading the store file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Appending or rewriting the store file failed
    #[error("Write failed on {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another writer panicked while holding the store lock
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// Maps a read-side I/O error, folding `NotFound` into its own variant.
    pub fn from_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            StorageError::NotFound(path)
        } else {
            StorageError::Io { path, source }
        }
    }

    /// Maps a write-side I/O error.
    pub fn write_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Returns whether the error only means "nothing stored yet".
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}
