//! CLI argument definitions using clap
//!
//! Commands:
//! - invitedb create --name <name> --email <email> [--status <status>]
//! - invitedb find <identifier>
//! - invitedb invite <identifier>
//! - invitedb list
//! - invitedb demo

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default config location, used only if the file exists
pub const DEFAULT_CONFIG_PATH: &str = "./invitedb.json";

/// invitedb - a flat-file user registry with invite tracking
#[derive(Parser, Debug)]
#[command(name = "invitedb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Store file, overriding the configured store_path
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a user and append it to the store
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Email address; the user id is derived from it
        #[arg(long)]
        email: String,

        /// Initial status (default: "ENVIAR CONVITE")
        #[arg(long)]
        status: Option<String>,
    },

    /// Find a user by id or email
    Find {
        /// User id or email
        identifier: String,
    },

    /// Mark a user as invited
    Invite {
        /// User id or email
        identifier: String,
    },

    /// List every stored user
    List,

    /// Run the example create/search walkthrough
    Demo,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
