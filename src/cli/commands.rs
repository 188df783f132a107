//! CLI command implementations
//!
//! Commands resolve the config, build a registry over the store file, run
//! one registry operation and print the result as JSON.

use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;

use crate::config::Config;
use crate::observability;
use crate::registry::UserRegistry;
use crate::storage::{FileStorage, Status, User};

use super::args::{Cli, Command, DEFAULT_CONFIG_PATH};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response, NOT_FOUND_CODE};

/// Parse arguments, set up logging and run the requested command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = resolve_config(&cli)?;

    let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
    observability::init_logging(level);

    let mut stdout = io::stdout().lock();
    run_command(&config, cli.command, &mut stdout)
}

/// Loads the config and applies command line overrides.
///
/// An explicit `--config` must exist; the default location is optional.
pub fn resolve_config(cli: &Cli) -> CliResult<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
    };
    if let Some(store) = &cli.store {
        if store.as_os_str().is_empty() {
            return Err(CliError::config_error("--store must not be empty"));
        }
        config.store_path = store.clone();
    }
    Ok(config)
}

/// Run the appropriate command, writing its response to `out`
pub fn run_command<W: Write>(config: &Config, cmd: Command, out: &mut W) -> CliResult<()> {
    debug!(store = %config.store_path.display(), command = ?cmd, "running command");
    let registry = UserRegistry::new(FileStorage::new(&config.store_path));

    match cmd {
        Command::Create {
            name,
            email,
            status,
        } => create(&registry, &name, &email, status, out),
        Command::Find { identifier } => find(&registry, &identifier, out),
        Command::Invite { identifier } => invite(&registry, &identifier, out),
        Command::List => list(&registry, out),
        Command::Demo => demo(&registry, out),
    }
}

/// Create a user
pub fn create<W: Write>(
    registry: &UserRegistry<FileStorage>,
    name: &str,
    email: &str,
    status: Option<String>,
    out: &mut W,
) -> CliResult<()> {
    let user = registry.create(name, email, status.map(Status::from));
    write_response(out, user_json(&user)?)
}

/// Find a user by id or email
pub fn find<W: Write>(
    registry: &UserRegistry<FileStorage>,
    identifier: &str,
    out: &mut W,
) -> CliResult<()> {
    match registry.find(identifier) {
        Some(user) => write_response(out, user_json(&user)?),
        None => write_not_found(out, identifier),
    }
}

/// Mark a user as invited.
///
/// Reports an error object both when nothing matches and when the store
/// could not be rewritten; `status: ok` always means the invite was saved.
pub fn invite<W: Write>(
    registry: &UserRegistry<FileStorage>,
    identifier: &str,
    out: &mut W,
) -> CliResult<()> {
    match registry.send_invite(identifier) {
        Some(user) => write_response(out, user_json(&user)?),
        None => write_error(
            out,
            NOT_FOUND_CODE,
            &format!("No invite saved for identifier: {}", identifier),
        ),
    }
}

/// List every stored user
pub fn list<W: Write>(registry: &UserRegistry<FileStorage>, out: &mut W) -> CliResult<()> {
    let users = registry.list();
    write_response(out, serde_json::to_value(&users)?)
}

/// Create a sample user, then search for an unknown email and for the
/// new user's id.
pub fn demo<W: Write>(registry: &UserRegistry<FileStorage>, out: &mut W) -> CliResult<()> {
    let created = registry.create("felipe", "fmartiniano@tv1.com.br", None);
    let by_email = registry.find("jane@example.com");
    let by_id = registry.find(created.id.as_str());

    write_response(
        out,
        json!({
            "created": user_json(&created)?,
            "found_by_email": by_email.as_ref().map(user_json).transpose()?,
            "found_by_id": by_id.as_ref().map(user_json).transpose()?,
        }),
    )
}

fn user_json(user: &User) -> CliResult<Value> {
    Ok(serde_json::to_value(user)?)
}

fn write_not_found<W: Write>(out: &mut W, identifier: &str) -> CliResult<()> {
    write_error(
        out,
        NOT_FOUND_CODE,
        &format!("No user found with identifier: {}", identifier),
    )
}
