//! User registry for invitedb
//!
//! Creates users, looks them up by id or email, and tracks whether an
//! invite was sent. Storage is injected, so the same registry runs over
//! the flat file or an in-memory store.

mod users;

pub use users::UserRegistry;
