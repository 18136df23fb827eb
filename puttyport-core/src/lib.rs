//! `puttyport` Core Library
//!
//! This crate imports saved SSH sessions and port forwards from PuTTY
//! registry exports and reconciles them against a destination host store.
//!
//! # Crate Structure
//!
//! - [`models`] - Sessions, port forwards, and stored host records
//! - [`import`] - Decoding, tokenizing, validation, and reconciliation
//! - [`store`] - The host store contract with in-memory and JSON backends
//! - [`config`] - Import settings and persistence
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod store;
pub mod tracing;

pub use config::{BindAddressChoice, ConfigManager, ImportLimits, ImportSettings};
pub use error::{ConfigError, ForwardParseError, ImportError, StoreError};
pub use import::{
    Classification, ImportExecutor, ImportPlan, ImportSummary, ParseResult, PuttyImporter,
    Selection, classify, parse_port_forwards,
};
pub use models::{HostRecord, PortForwardDescriptor, PortForwardRecord, SessionDescriptor};
pub use store::{HostStore, JsonHostStore, MemoryHostStore};
