//! Shared utility functions used across command modules.

use std::path::{Path, PathBuf};

use puttyport_core::import::Selection;
use puttyport_core::{ConfigManager, ImportSettings, JsonHostStore, ParseResult, PuttyImporter};

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads settings through the config manager
pub fn load_settings(
    config_path: Option<&Path>,
) -> Result<(ConfigManager, ImportSettings), CliError> {
    let manager = create_config_manager(config_path)?;
    let settings = manager.load_settings()?;
    Ok((manager, settings))
}

/// Parses an export file, turning a fatal parse error into `CliError::Parse`.
///
/// Warnings are echoed to stderr unless `quiet` is set.
pub fn parse_export(
    file: &Path,
    settings: &ImportSettings,
    quiet: bool,
) -> Result<ParseResult, CliError> {
    let result = PuttyImporter::with_limits(settings.limits).import_from_path(file);

    if !quiet {
        for warning in &result.warnings {
            eprintln!("Warning: {warning}");
        }
    }

    if let Some(error) = result.errors.first() {
        return Err(CliError::Parse(error.to_string()));
    }
    Ok(result)
}

/// Opens the host store named on the command line or in the settings
pub fn open_store(
    manager: &ConfigManager,
    settings: &ImportSettings,
    store: Option<&Path>,
) -> Result<JsonHostStore, CliError> {
    let path: PathBuf = store.map_or_else(|| manager.store_path(settings), Path::to_path_buf);
    Ok(JsonHostStore::open(path)?)
}

/// Builds a selection from repeated `--session` flags
pub fn selection_from(sessions: Vec<String>) -> Selection {
    if sessions.is_empty() {
        Selection::All
    } else {
        Selection::only(sessions)
    }
}

/// Serializes a value as pretty JSON
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::Output(format!("Failed to serialize to JSON: {e}")))
}
