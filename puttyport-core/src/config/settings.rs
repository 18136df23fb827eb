//! Import settings persisted as TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::import::dedup::MAX_SESSIONS;
use crate::import::validate::is_valid_hostname;
use crate::models::{BIND_ALL_INTERFACES, BIND_LOCALHOST};

/// Default cap on the export size, 1 MiB
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Resource caps applied to a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportLimits {
    /// Largest accepted export in bytes
    pub max_file_size: u64,
    /// Most sessions accepted from one export
    pub max_sessions: usize,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            max_sessions: MAX_SESSIONS,
        }
    }
}

/// Bind address applied to every imported forward.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindAddressChoice {
    /// Keep whatever each forward was parsed with
    #[default]
    Keep,
    /// Force `localhost`
    Localhost,
    /// Force `0.0.0.0`
    AllInterfaces,
    /// Force a specific address
    Custom(String),
}

impl BindAddressChoice {
    /// The address to force, `None` for [`Self::Keep`]
    #[must_use]
    pub fn override_address(&self) -> Option<&str> {
        match self {
            Self::Keep => None,
            Self::Localhost => Some(BIND_LOCALHOST),
            Self::AllInterfaces => Some(BIND_ALL_INTERFACES),
            Self::Custom(address) => Some(address),
        }
    }
}

impl std::str::FromStr for BindAddressChoice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "localhost" => Ok(Self::Localhost),
            "all" | "all-interfaces" | "0.0.0.0" => Ok(Self::AllInterfaces),
            _ if is_valid_hostname(s) => Ok(Self::Custom(s.to_string())),
            _ => Err(ConfigError::Parse(format!("invalid bind address '{s}'"))),
        }
    }
}

impl std::fmt::Display for BindAddressChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Localhost => write!(f, "localhost"),
            Self::AllInterfaces => write!(f, "all-interfaces"),
            Self::Custom(address) => write!(f, "{address}"),
        }
    }
}

/// Top-level settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Parse caps
    pub limits: ImportLimits,
    /// Global bind address override for imported forwards
    pub bind_address: BindAddressChoice,
    /// Host store location, the config directory's `hosts.json` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl ImportSettings {
    /// Checks values serde cannot check.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` describing the first invalid value.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.limits.max_file_size == 0 {
            return Err(ConfigError::Parse(
                "limits.max_file_size must be positive".to_string(),
            ));
        }
        if self.limits.max_sessions == 0 {
            return Err(ConfigError::Parse(
                "limits.max_sessions must be positive".to_string(),
            ));
        }
        if let BindAddressChoice::Custom(address) = &self.bind_address
            && !is_valid_hostname(address)
        {
            return Err(ConfigError::Parse(format!(
                "invalid bind address '{address}'"
            )));
        }
        Ok(())
    }
}
