//! User registry operations
//!
//! Every operation here swallows storage failures: they are logged and
//! the caller gets an empty result, `None`, or a no-op.

use tracing::{debug, error, info, warn};

use crate::storage::{RecordStorage, Status, StorageError, User};

/// Registry of users over an injected record store.
#[derive(Debug)]
pub struct UserRegistry<S: RecordStorage> {
    storage: S,
}

impl<S: RecordStorage> UserRegistry<S> {
    /// Creates a registry over `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Creates a user and appends it to the store.
    ///
    /// The id is derived from `email`; a missing status becomes
    /// [`Status::SendInvite`]. Existing users with the same id are not
    /// checked, so repeated creates leave duplicate rows.
    ///
    /// The user is returned even when the append fails; the failure is
    /// logged and the user is simply not persisted.
    pub fn create(&self, name: &str, email: &str, status: Option<Status>) -> User {
        let user = User::new(name, email, status);

        let unsafe_fields = user.unsafe_fields();
        if !unsafe_fields.is_empty() {
            warn!(
                id = %user.id,
                fields = ?unsafe_fields,
                "user fields contain a separator or line break and will not read back"
            );
        }

        match self.storage.append(&user) {
            Ok(()) => info!(id = %user.id, name = %user.name, "user saved"),
            Err(e) => error!(id = %user.id, error = %e, "failed to save user"),
        }

        user
    }

    /// Finds the first user whose id or email equals `identifier`.
    ///
    /// Users are scanned in store order; the first match wins.
    pub fn find(&self, identifier: &str) -> Option<User> {
        let found = self.load().into_iter().find(|u| u.matches(identifier));
        if found.is_none() {
            info!(identifier, "no user found");
        }
        found
    }

    /// Returns every well-formed user in store order.
    pub fn list(&self) -> Vec<User> {
        self.load()
    }

    /// Marks the user behind `identifier` as invited and persists it.
    ///
    /// Returns the updated user, or `None` if nothing matched or the
    /// store could not be rewritten.
    pub fn send_invite(&self, identifier: &str) -> Option<User> {
        let mut user = self.find(identifier)?;
        if self.send_invite_to(&mut user) {
            Some(user)
        } else {
            warn!(id = %user.id, "invite not saved");
            None
        }
    }

    /// Marks `user` as invited and rewrites the store.
    ///
    /// Every stored row with the same id is replaced by `user`; all other
    /// rows are written back unchanged and in order. Returns whether the
    /// store was rewritten.
    pub fn send_invite_to(&self, user: &mut User) -> bool {
        user.status = Status::InviteSent;
        let persisted = self.update(user);
        if persisted {
            info!(id = %user.id, name = %user.name, status = %user.status, "invite sent");
        }
        persisted
    }

    /// Rewrites the store with `updated` in place of rows sharing its id.
    ///
    /// A failed load aborts before anything is written.
    fn update(&self, updated: &User) -> bool {
        let mut replaced = 0usize;
        let result = self.storage.update(|users| {
            users
                .into_iter()
                .map(|u| {
                    if u.id == updated.id {
                        replaced += 1;
                        updated.clone()
                    } else {
                        u
                    }
                })
                .collect()
        });

        match result {
            Ok(()) => {
                debug!(id = %updated.id, replaced, "store rewritten");
                true
            }
            Err(e) if e.is_not_found() => {
                Self::log_load_error(&e);
                false
            }
            Err(e) => {
                error!(id = %updated.id, error = %e, "failed to update user");
                false
            }
        }
    }

    fn load(&self) -> Vec<User> {
        self.storage.load_all().unwrap_or_else(|e| {
            Self::log_load_error(&e);
            Vec::new()
        })
    }

    fn log_load_error(e: &StorageError) {
        if e.is_not_found() {
            warn!(error = %e, "store is empty");
        } else {
            error!(error = %e, "failed to load users");
        }
    }
}
