//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use puttyport_core::BindAddressChoice;

/// Import PuTTY sessions and port forwards from registry exports
#[derive(Parser)]
#[command(name = "puttyport")]
#[command(author, version, about = "Import PuTTY registry exports into a host store")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true, env = "PUTTYPORT_CONFIG_DIR")]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a registry export and list its sessions
    #[command(about = "Parse a PuTTY registry export and list the sessions it contains")]
    Parse {
        /// Registry export file (.reg)
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Parse a `PortForwardings` value
    #[command(about = "Parse a PuTTY PortForwardings value, e.g. L8080=localhost:80,D1080")]
    Forwards {
        /// Comma separated forwarding list
        spec: String,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Show what an import would change
    #[command(about = "Classify sessions as new, updated, or unchanged against the host store")]
    Plan {
        /// Registry export file (.reg)
        file: PathBuf,

        /// Host store file (defaults to the configured store)
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Only consider these sessions (repeatable)
        #[arg(long = "session", value_name = "NAME")]
        sessions: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Import sessions into the host store
    #[command(about = "Import sessions and port forwards into the host store")]
    Import {
        /// Registry export file (.reg)
        file: PathBuf,

        /// Host store file (defaults to the configured store)
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Only import these sessions (repeatable)
        #[arg(long = "session", value_name = "NAME")]
        sessions: Vec<String>,

        /// Bind address for every imported forward
        /// (keep, localhost, all, or an address)
        #[arg(short, long, value_name = "ADDRESS")]
        bind: Option<BindAddressChoice>,

        /// Show the plan without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

/// Output format for listings
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    #[default]
    Table,
    /// Output as JSON
    Json,
}
