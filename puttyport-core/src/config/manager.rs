//! Loading and saving the settings file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

use super::settings::ImportSettings;

/// Directory name under the platform config directory
pub const CONFIG_DIR_NAME: &str = "puttyport";
/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "settings.toml";
/// Default host store file name
pub const STORE_FILE_NAME: &str = "hosts.json";

/// Locates, reads, and writes [`ImportSettings`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Uses `<platform config dir>/puttyport`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoConfigDir` if the platform has no config directory.
    pub fn new() -> ConfigResult<Self> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join(CONFIG_DIR_NAME)))
    }

    /// Uses an explicit directory
    #[must_use]
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// The configuration directory
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the settings file
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }

    /// Store path from the settings, or the default next to them
    #[must_use]
    pub fn store_path(&self, settings: &ImportSettings) -> PathBuf {
        settings
            .store_path
            .clone()
            .unwrap_or_else(|| self.config_dir.join(STORE_FILE_NAME))
    }

    /// Loads settings; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// fails validation.
    pub fn load_settings(&self) -> ConfigResult<ImportSettings> {
        Self::load_from(&self.settings_path())
    }

    /// Loads settings from an explicit file; a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// fails validation.
    pub fn load_from(path: &Path) -> ConfigResult<ImportSettings> {
        let _span = crate::trace_operation!(
            crate::tracing::span_names::CONFIG_LOAD,
            path = %path.display()
        )
        .entered();

        if !path.exists() {
            tracing::debug!("Settings file not found, using defaults");
            return Ok(ImportSettings::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let settings: ImportSettings =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Writes settings, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_settings(&self, settings: &ImportSettings) -> ConfigResult<()> {
        let path = self.settings_path();
        let _span = crate::trace_operation!(
            crate::tracing::span_names::CONFIG_SAVE,
            path = %path.display()
        )
        .entered();

        let content =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::create_dir_all(&self.config_dir).map_err(|e| ConfigError::Io {
            path: self.config_dir.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&path, content).map_err(|e| ConfigError::Io {
            path: path.clone(),
            reason: e.to_string(),
        })
    }
}
