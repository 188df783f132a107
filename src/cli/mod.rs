//! CLI module for invitedb
//!
//! Provides command-line interface for:
//! - create: Add a user to the store
//! - find: Look a user up by id or email
//! - invite: Mark a user as invited
//! - list: Print every stored user
//! - demo: Example walkthrough

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, DEFAULT_CONFIG_PATH};
pub use commands::{create, demo, find, invite, list, resolve_config, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response, NOT_FOUND_CODE};
