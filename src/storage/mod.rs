//! User record storage for invitedb
//!
//! The store is a flat text file with one `id;name;email;status` line per
//! user. It supports three things only: append a line, scan every line,
//! and replace the whole file.
//!
//! # Design Principles
//!
//! - Malformed lines are skipped on read, never fatal
//! - Appends are a single fsynced write
//! - Rewrites go through a temp file and an atomic rename
//! - Writers within one process are serialised
//! - No uniqueness, no index, no escaping

mod backend;
mod errors;
mod file;
mod memory;
mod reader;
mod record;
mod writer;

pub use backend::RecordStorage;
pub use errors::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use reader::StoreReader;
pub use record::{Status, User, UserId, FIELD_SEPARATOR};
pub use writer::StoreWriter;
