//! Error types for `puttyport`.
//!
//! Fatal parse failures are reported through [`ImportError`]. Everything that
//! only affects a single section, key, or forwarding entry is downgraded to a
//! warning at the item boundary and never shows up here.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a whole registry parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The declared input length exceeds the configured cap
    #[error("File too large: {size} bytes (max {limit} bytes)")]
    FileTooLarge {
        /// Declared length of the input
        size: u64,
        /// Maximum accepted length
        limit: u64,
    },

    /// The input could not be turned into usable text
    #[error("File encoding error: {0}")]
    Encoding(String),

    /// The text does not look like a registry export
    #[error("Invalid or corrupted registry file")]
    InvalidStructure,

    /// The export contains no PuTTY session sections at all
    #[error("No PuTTY SSH sessions found")]
    NoSessions,

    /// Session sections were present but none survived validation
    #[error("No valid SSH sessions found")]
    NoValidSessions,

    /// The file could not be read
    #[error("Failed to read {path}: {reason}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error message
        reason: String,
    },
}

impl ImportError {
    /// Returns a short, user-facing category for the error.
    ///
    /// Presentation layers map these onto localized messages.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::FileTooLarge { .. } => "file_too_large",
            Self::Encoding(_) => "encoding",
            Self::InvalidStructure | Self::Io { .. } => "invalid_file",
            Self::NoSessions | Self::NoValidSessions => "no_sessions",
        }
    }
}

/// Reasons a single port forwarding entry is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForwardParseError {
    /// Entry was empty after trimming
    #[error("empty forwarding entry")]
    Empty,

    /// The type letter is not one of `L`, `R`, `D`
    #[error("unknown forward type '{0}'")]
    UnknownType(char),

    /// A port field is not a decimal number in 1..=65535
    #[error("invalid port '{0}'")]
    InvalidPort(String),

    /// Local or remote forward without `=host:port`
    #[error("missing destination")]
    MissingDestination,

    /// Address could not be split from its port
    #[error("malformed address '{0}'")]
    MalformedAddress(String),

    /// Destination host failed validation
    #[error("invalid destination host '{0}'")]
    InvalidHost(String),
}

/// Errors raised by a [`crate::store::HostStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be (de)serialized
    #[error("Store serialization error: {0}")]
    Serialization(String),

    /// A record referenced by id does not exist
    #[error("Record not found: {0}")]
    NotFound(uuid::Uuid),
}

/// Errors raised while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file could not be read or written
    #[error("Failed to access {path}: {reason}")]
    Io {
        /// Path of the settings file
        path: PathBuf,
        /// Underlying error message
        reason: String,
    },

    /// Settings file is not valid TOML for [`crate::config::ImportSettings`]
    #[error("Failed to parse settings: {0}")]
    Parse(String),

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(String),

    /// No configuration directory could be determined
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
