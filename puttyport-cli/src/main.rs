//! `puttyport` - Command-line interface for importing PuTTY sessions
//!
//! Parses PuTTY registry exports, previews how they relate to an existing
//! host store, and imports sessions with their port forwards.

mod cli;
mod commands;
mod error;
mod util;

use clap::Parser;
use cli::Cli;
use puttyport_core::tracing::{TracingConfig, TracingLevel, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let level = if cli.quiet {
        TracingLevel::Error
    } else {
        TracingLevel::from_verbosity(cli.verbose)
    };
    if let Err(e) = init_tracing(&TracingConfig::new().with_level(level)) {
        eprintln!("Warning: {e}");
    }

    let result = commands::dispatch(config_path, cli.quiet, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}
