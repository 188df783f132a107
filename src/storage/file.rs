//! # Flat File Backend

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::backend::RecordStorage;
use super::errors::{StorageError, StorageResult};
use super::reader::StoreReader;
use super::record::User;
use super::writer::StoreWriter;

/// Store backed by a single semicolon-delimited text file.
///
/// Appends and rewrites through one instance are serialised by an
/// internal lock. Nothing guards against other processes writing the
/// same file.
#[derive(Debug)]
pub struct FileStorage {
    writer: StoreWriter,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Create a file backend for the store at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            writer: StoreWriter::new(&path),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StorageError::LockPoisoned)
    }
}

impl RecordStorage for FileStorage {
    fn append(&self, user: &User) -> StorageResult<()> {
        let _guard = self.lock()?;
        self.writer.append(user)
    }

    fn load_all(&self) -> StorageResult<Vec<User>> {
        StoreReader::open(self.path())?.read_all()
    }

    fn replace_all(&self, users: &[User]) -> StorageResult<()> {
        let _guard = self.lock()?;
        self.writer.rewrite(users)
    }

    fn update<F>(&self, f: F) -> StorageResult<()>
    where
        F: FnOnce(Vec<User>) -> Vec<User>,
    {
        let _guard = self.lock()?;
        let users = StoreReader::open(self.path())?.read_all()?;
        self.writer.rewrite(&f(users))
    }
}
