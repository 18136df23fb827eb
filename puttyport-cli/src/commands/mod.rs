//! Command handler modules for the CLI.

mod forwards;
mod import;
mod parse;
mod plan;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, quiet: bool, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Parse { file, format } => parse::cmd_parse(config_path, quiet, &file, format),
        Commands::Forwards { spec, format } => forwards::cmd_forwards(&spec, format),
        Commands::Plan {
            file,
            store,
            sessions,
            format,
        } => plan::cmd_plan(
            config_path,
            quiet,
            plan::PlanParams {
                file: &file,
                store: store.as_deref(),
                sessions,
                format,
            },
        ),
        Commands::Import {
            file,
            store,
            sessions,
            bind,
            dry_run,
        } => import::cmd_import(
            config_path,
            quiet,
            import::ImportParams {
                file: &file,
                store: store.as_deref(),
                sessions,
                bind,
                dry_run,
            },
        ),
    }
}
