//! Plan command: preview an import against the host store.

use std::fmt::Write as _;
use std::path::Path;

use puttyport_core::ImportPlan;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::{load_settings, open_store, parse_export, selection_from, to_json};

/// Arguments of the plan command
pub struct PlanParams<'a> {
    pub file: &'a Path,
    pub store: Option<&'a Path>,
    pub sessions: Vec<String>,
    pub format: OutputFormat,
}

/// Plan command handler
pub fn cmd_plan(
    config_path: Option<&Path>,
    quiet: bool,
    params: PlanParams<'_>,
) -> Result<(), CliError> {
    let (manager, settings) = load_settings(config_path)?;
    let result = parse_export(params.file, &settings, quiet)?;
    let store = open_store(&manager, &settings, params.store)?;
    let plan = ImportPlan::from_store(&result, &store, &selection_from(params.sessions))?;

    match params.format {
        OutputFormat::Table => println!("{}", format_plan(&plan)),
        OutputFormat::Json => {
            let entries: Vec<PlanEntryOutput> = plan
                .entries
                .iter()
                .map(|e| PlanEntryOutput {
                    name: e.session.nickname.clone(),
                    status: e.classification.label(),
                    existing_id: e.classification.existing_id().map(|id| id.to_string()),
                    forwards: e.forwards.len(),
                })
                .collect();
            println!("{}", to_json(&entries)?);
        }
    }
    Ok(())
}

/// Format a plan as a table followed by its summary line
#[must_use]
pub fn format_plan(plan: &ImportPlan) -> String {
    if plan.entries.is_empty() {
        return "No sessions selected.".to_string();
    }

    let mut output = String::new();
    let name_width = plan
        .entries
        .iter()
        .map(|e| e.session.nickname.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let _ = writeln!(output, "{:<name_width$}  {:<9}  FORWARDS", "NAME", "STATUS");
    for entry in &plan.entries {
        let _ = writeln!(
            output,
            "{:<name_width$}  {:<9}  {}",
            entry.session.nickname,
            entry.classification.label(),
            entry.forwards.len()
        );
    }
    let _ = write!(output, "\n{}", plan.summary());
    output
}

/// JSON shape of one plan entry
#[derive(Debug, Serialize)]
pub struct PlanEntryOutput {
    pub name: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_id: Option<String>,
    pub forwards: usize,
}
