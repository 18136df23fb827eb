//! Import command: write sessions and forwards into the host store.

use std::path::Path;

use puttyport_core::{BindAddressChoice, ImportExecutor, ImportPlan};

use crate::error::CliError;
use crate::util::{load_settings, open_store, parse_export, selection_from};

use super::plan::format_plan;

/// Arguments of the import command
pub struct ImportParams<'a> {
    pub file: &'a Path,
    pub store: Option<&'a Path>,
    pub sessions: Vec<String>,
    pub bind: Option<BindAddressChoice>,
    pub dry_run: bool,
}

/// Import command handler
pub fn cmd_import(
    config_path: Option<&Path>,
    quiet: bool,
    params: ImportParams<'_>,
) -> Result<(), CliError> {
    let (manager, settings) = load_settings(config_path)?;
    let result = parse_export(params.file, &settings, quiet)?;
    let mut store = open_store(&manager, &settings, params.store)?;
    let plan = ImportPlan::from_store(&result, &store, &selection_from(params.sessions))?;

    if params.dry_run {
        println!("{}", format_plan(&plan));
        return Ok(());
    }

    let bind = params.bind.unwrap_or(settings.bind_address);
    let summary = ImportExecutor::from_choice(&bind).execute(&plan, &mut store);

    if !quiet {
        println!("Import Summary:");
        println!("  Sessions imported: {}", summary.imported);
        println!("  Sessions unchanged: {}", summary.unchanged);
        println!("  Sessions skipped: {}", summary.skipped);
        println!("  Store: {}", store.path().display());
    }
    for failure in &summary.failures {
        tracing::error!("Import failed: {failure}");
    }

    if summary.is_complete() {
        Ok(())
    } else {
        Err(CliError::PartialImport(format!(
            "{} of {} sessions failed",
            summary.skipped,
            plan.total()
        )))
    }
}
