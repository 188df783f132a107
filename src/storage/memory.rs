//! # In-Memory Backend
//!
//! Keeps encoded lines rather than records so the line format and
//! parsing rules behave exactly as they do on disk.

use std::io::Cursor;
use std::sync::{Mutex, MutexGuard};

use super::backend::RecordStorage;
use super::errors::{StorageError, StorageResult};
use super::reader::StoreReader;
use super::record::User;

/// In-memory record store, mainly for tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// `None` until the first write, like a store file that does not exist
    contents: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// Create an empty store with no contents yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding raw text, malformed lines included
    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(text.into())),
        }
    }

    /// Returns a copy of the raw stored text
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Option<String>>> {
        self.contents.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl RecordStorage for MemoryStorage {
    fn append(&self, user: &User) -> StorageResult<()> {
        let mut contents = self.lock()?;
        let text = contents.get_or_insert_with(String::new);
        text.push_str(&user.to_line());
        text.push('\n');
        Ok(())
    }

    fn load_all(&self) -> StorageResult<Vec<User>> {
        let contents = self.lock()?;
        parse(contents.as_deref())
    }

    fn replace_all(&self, users: &[User]) -> StorageResult<()> {
        *self.lock()? = Some(encode(users));
        Ok(())
    }

    fn update<F>(&self, f: F) -> StorageResult<()>
    where
        F: FnOnce(Vec<User>) -> Vec<User>,
    {
        let mut contents = self.lock()?;
        let users = parse(contents.as_deref())?;
        *contents = Some(encode(&f(users)));
        Ok(())
    }
}

fn parse(text: Option<&str>) -> StorageResult<Vec<User>> {
    match text {
        Some(text) => StoreReader::from_reader("memory", Cursor::new(text.as_bytes())).read_all(),
        None => Err(StorageError::NotFound("memory".into())),
    }
}

fn encode(users: &[User]) -> String {
    users.iter().map(|u| format!("{}\n", u.to_line())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_is_not_found() {
        let storage = MemoryStorage::new();
        assert!(storage.load_all().unwrap_err().is_not_found());
        assert!(storage.contents().is_none());
    }

    #[test]
    fn test_append_encodes_lines() {
        let storage = MemoryStorage::new();
        let ana = User::new("ana", "ana@example.com", None);
        storage.append(&ana).unwrap();

        assert_eq!(storage.contents().unwrap(), format!("{}\n", ana.to_line()));
        assert_eq!(storage.load_all().unwrap(), vec![ana]);
    }

    #[test]
    fn test_malformed_seed_lines_are_skipped() {
        let storage = MemoryStorage::with_contents("1;a;a@x;S\nbroken\n");
        assert_eq!(storage.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_replace_all() {
        let storage = MemoryStorage::with_contents("junk\n");
        let ana = User::new("ana", "ana@example.com", None);
        storage.replace_all(std::slice::from_ref(&ana)).unwrap();
        assert_eq!(storage.contents().unwrap(), format!("{}\n", ana.to_line()));
    }

    #[test]
    fn test_update_rewrites_in_place() {
        let storage = MemoryStorage::with_contents("junk\n1;a;a@x;S\n2;b;b@x;S\n");
        storage
            .update(|users| users.into_iter().filter(|u| u.name != "a").collect())
            .unwrap();
        assert_eq!(storage.contents().unwrap(), "2;b;b@x;S\n");
    }

    #[test]
    fn test_update_on_empty_store_writes_nothing() {
        let storage = MemoryStorage::new();
        assert!(storage.update(|users| users).unwrap_err().is_not_found());
        assert!(storage.contents().is_none());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let storage = std::sync::Arc::new(MemoryStorage::new());
        let poisoner = std::sync::Arc::clone(&storage);
        let result = std::thread::spawn(move || {
            let _guard = poisoner.contents.lock().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(result.is_err());

        assert!(matches!(storage.load_all(), Err(StorageError::LockPoisoned)));
        assert!(storage.contents().is_none());
    }
}
