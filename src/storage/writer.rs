//! Store file writer
//!
//! Two write paths exist:
//! - append: one line at the end of the file, fsynced
//! - rewrite: the whole file replaced atomically
//!
//! Rewrite goes through a temp file:
//! 1. Write every line to `<store>.tmp`
//! 2. fsync the temp file
//! 3. Rename temp over the store (atomic on POSIX)

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::User;

/// Writer for the flat store file.
#[derive(Debug, Clone)]
pub struct StoreWriter {
    /// Path to the store file
    store_path: PathBuf,
    /// Path to the temp file used during rewrite
    temp_path: PathBuf,
}

impl StoreWriter {
    /// Creates a writer for the store at `store_path`.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(store_path: &Path) -> Self {
        let mut temp_name = store_path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        Self {
            store_path: store_path.to_path_buf(),
            temp_path: store_path.with_file_name(temp_name),
        }
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.store_path
    }

    /// Appends one record line, creating the file and parent directories
    /// if missing.
    pub fn append(&self, user: &User) -> StorageResult<()> {
        self.ensure_parent_dir()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.store_path)
            .map_err(|e| StorageError::write_failed(&self.store_path, e))?;

        // Single write call so the line lands whole
        let line = format!("{}\n", user.to_line());
        file.write_all(line.as_bytes())
            .map_err(|e| StorageError::write_failed(&self.store_path, e))?;

        file.sync_all()
            .map_err(|e| StorageError::write_failed(&self.store_path, e))
    }

    /// Replaces the store contents with `users`, in order.
    pub fn rewrite(&self, users: &[User]) -> StorageResult<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)
            .map_err(|e| StorageError::write_failed(&self.temp_path, e))?;

        let mut writer = BufWriter::new(file);
        for user in users {
            writeln!(writer, "{}", user.to_line())
                .map_err(|e| StorageError::write_failed(&self.temp_path, e))?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| StorageError::write_failed(&self.temp_path, e.into_error()))?;
        file.sync_all()
            .map_err(|e| StorageError::write_failed(&self.temp_path, e))?;

        if let Err(e) = fs::rename(&self.temp_path, &self.store_path) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(StorageError::write_failed(&self.store_path, e));
        }

        // fsync the directory so the rename itself is durable
        if let Some(parent) = self.parent_dir() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.store_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }

    fn ensure_parent_dir(&self) -> StorageResult<()> {
        if let Some(parent) = self.parent_dir() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| StorageError::write_failed(parent, e))?;
            }
        }
        Ok(())
    }
}
