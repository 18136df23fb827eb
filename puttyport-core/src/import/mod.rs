//! Import engine for PuTTY registry exports.
//!
//! The pipeline runs leaves first:
//! - [`decode`] detects the byte-order mark and produces text
//! - [`tokenizer`] scans the text into one section per saved session
//! - [`validate`] and [`session`] turn sections into [`SessionDescriptor`]s
//! - [`forward`] parses the `PortForwardings` value
//! - [`dedup`] drops duplicate names and enforces the session cap
//!
//! [`PuttyImporter`] drives these steps and returns a [`ParseResult`].
//! Writing to a destination store is a separate, explicit step:
//!
//! ```ignore
//! let result = PuttyImporter::new().import_from_path(&path);
//! let plan = ImportPlan::from_store(&result, &store, &Selection::All)?;
//! println!("{}", plan.summary());
//! let summary = ImportExecutor::default().execute(&plan, &mut store);
//! ```
//!
//! [`SessionDescriptor`]: crate::models::SessionDescriptor

pub mod decode;
pub mod dedup;
mod executor;
pub mod forward;
mod putty;
mod reconcile;
mod result;
pub mod session;
pub mod tokenizer;
pub mod validate;

pub use decode::{DetectedEncoding, decode_registry_bytes, decode_with_detection};
pub use dedup::{GateDecision, MAX_SESSIONS, SessionGate};
pub use executor::{ImportExecutor, ImportSummary};
pub use forward::{parse_port_forward, parse_port_forwards};
pub use putty::PuttyImporter;
pub use reconcile::{
    Classification, ImportPlan, PlannedImport, Selection, classify, forwards_match,
    merge_into_existing,
};
pub use result::{
    ParseResult, ParseResultBuilder, PortForwardCreation, SkippedField, SkippedFieldReason,
};
pub use session::{SessionBuild, build_session};
pub use tokenizer::{RegistrySection, RegistryValue, SectionTokenizer};
