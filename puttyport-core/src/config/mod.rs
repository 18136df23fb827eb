//! Configuration management for `puttyport`
//!
//! This module provides the `ConfigManager` for loading and saving
//! import settings in TOML format.

mod manager;
pub mod settings;

pub use manager::{CONFIG_DIR_NAME, ConfigManager, SETTINGS_FILE_NAME, STORE_FILE_NAME};
pub use settings::{BindAddressChoice, ImportLimits, ImportSettings, MAX_FILE_SIZE};
