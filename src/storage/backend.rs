//! Record storage capability
//!
//! The registry only talks to storage through this trait, so the flat
//! file can be swapped for an in-memory fake in tests.

use super::errors::StorageResult;
use super::record::User;

/// Backend trait for the user record store
pub trait RecordStorage: Send + Sync + std::fmt::Debug {
    /// Append one record at the end of the store
    fn append(&self, user: &User) -> StorageResult<()>;

    /// Load every well-formed record, in store order
    fn load_all(&self) -> StorageResult<Vec<User>>;

    /// Replace the whole store with `users`, in the given order
    fn replace_all(&self, users: &[User]) -> StorageResult<()>;

    /// Load, transform and replace the store as one step.
    ///
    /// No append or replace through the same backend runs in between, so
    /// rows written concurrently are never lost by the rewrite.
    fn update<F>(&self, f: F) -> StorageResult<()>
    where
        F: FnOnce(Vec<User>) -> Vec<User>;
}
