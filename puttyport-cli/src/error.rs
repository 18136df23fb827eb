//! CLI error types and exit codes.

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, store, or argument errors
    pub const GENERAL_ERROR: i32 = 1;
    /// The registry export could not be parsed at all
    pub const PARSE_FAILURE: i32 = 2;
    /// The import ran but some sessions could not be written
    pub const PARTIAL_IMPORT: i32 = 3;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fatal parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Host store error
    #[error("Store error: {0}")]
    Store(String),

    /// Some sessions failed to import
    #[error("Import incomplete: {0}")]
    PartialImport(String),

    /// Output could not be produced
    #[error("Output error: {0}")]
    Output(String),
}

impl From<puttyport_core::ConfigError> for CliError {
    fn from(err: puttyport_core::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<puttyport_core::StoreError> for CliError {
    fn from(err: puttyport_core::StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Parse(_) => exit_codes::PARSE_FAILURE,
            Self::PartialImport(_) => exit_codes::PARTIAL_IMPORT,
            Self::Config(_) | Self::Store(_) | Self::Output(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
