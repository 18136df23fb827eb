//! Aggregate parse output and per-field diagnostics.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::ImportError;
use crate::models::{PortForwardDescriptor, SessionDescriptor};

use super::decode::DetectedEncoding;

/// A single field that was not imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedField {
    /// Session the field belongs to
    pub session_name: String,
    /// Registry key name
    pub field_name: String,
    /// Value as found in the export
    pub original_value: Option<String>,
    /// Why the field was dropped
    pub reason: SkippedFieldReason,
}

/// Reason why a field was skipped during import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkippedFieldReason {
    /// Value is malformed or fails validation
    InvalidValue,
    /// Numeric value lies outside the accepted range
    OutOfRange,
    /// Value has a registry type the field does not accept
    WrongType,
}

impl SkippedFieldReason {
    /// Returns a human-readable description of the reason
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidValue => "Invalid or malformed value",
            Self::OutOfRange => "Value out of range",
            Self::WrongType => "Unexpected value type",
        }
    }
}

impl SkippedField {
    /// Creates a skipped field with the original value
    #[must_use]
    pub fn with_value(
        session_name: impl Into<String>,
        field_name: impl Into<String>,
        value: impl Into<String>,
        reason: SkippedFieldReason,
    ) -> Self {
        Self {
            session_name: session_name.into(),
            field_name: field_name.into(),
            original_value: Some(value.into()),
            reason,
        }
    }
}

/// Forwards of one session bound to a destination host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortForwardCreation {
    /// Descriptors carrying the host id, ready to be stored
    pub created: Vec<PortForwardDescriptor>,
    /// Descriptors that could not be bound
    pub errors: Vec<String>,
}

impl PortForwardCreation {
    /// Returns true if any forward was refused
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Result of parsing one registry export.
///
/// When `errors` is non-empty the parse was aborted: `sessions` and
/// `port_forwards` are empty and `errors` holds exactly one entry.
#[derive(Debug, Clone, Default)]
pub struct ParseResult {
    /// Accepted sessions in file order
    pub sessions: Vec<SessionDescriptor>,
    /// Fatal errors
    pub errors: Vec<ImportError>,
    /// Non-fatal, per-item messages
    pub warnings: Vec<String>,
    /// True if sessions beyond the cap were dropped
    pub truncated: bool,
    /// Parsed forwards keyed by session name
    pub port_forwards: HashMap<String, Vec<PortForwardDescriptor>>,
    /// Field-level drops, for diagnostics only
    pub skipped_fields: Vec<SkippedField>,
    /// Encoding the text was decoded with, absent if decoding never ran
    pub encoding: Option<DetectedEncoding>,
}

impl ParseResult {
    /// Creates a result holding a single fatal error
    #[must_use]
    pub fn fatal(error: ImportError) -> Self {
        Self {
            errors: vec![error],
            ..Self::default()
        }
    }

    /// Returns true if the parse was not aborted
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns true if warnings were recorded
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Looks up an accepted session by name
    #[must_use]
    pub fn session(&self, name: &str) -> Option<&SessionDescriptor> {
        self.sessions.iter().find(|s| s.nickname == name)
    }

    /// Parsed forwards of a session, empty if it has none
    #[must_use]
    pub fn forwards(&self, name: &str) -> &[PortForwardDescriptor] {
        self.port_forwards.get(name).map_or(&[], Vec::as_slice)
    }

    /// Total number of parsed forwards across all sessions
    #[must_use]
    pub fn forward_count(&self) -> usize {
        self.port_forwards.values().map(Vec::len).sum()
    }

    /// Binds the forwards of `name` to a destination host.
    ///
    /// Descriptors are copied; the parse result itself is not modified.
    #[must_use]
    pub fn forwards_for_host(&self, name: &str, host_id: Uuid) -> PortForwardCreation {
        let mut creation = PortForwardCreation::default();
        for forward in self.forwards(name) {
            let consistent = forward.source_port != 0
                && forward.kind.requires_destination() == forward.destination.is_some();
            if consistent {
                creation.created.push(forward.with_host(host_id));
            } else {
                creation
                    .errors
                    .push(format!("Failed to create port forward {forward}"));
            }
        }
        creation
    }

    /// Returns a one-line summary of the parse
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Sessions: {}, Forwards: {}, Warnings: {}, Errors: {}{}",
            self.sessions.len(),
            self.forward_count(),
            self.warnings.len(),
            self.errors.len(),
            if self.truncated { " (truncated)" } else { "" }
        )
    }
}

/// Accumulator threaded through the parse pipeline.
#[derive(Debug, Default)]
pub struct ParseResultBuilder {
    result: ParseResult,
}

impl ParseResultBuilder {
    /// Creates an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the decoding that was used
    pub fn set_encoding(&mut self, encoding: DetectedEncoding) {
        self.result.encoding = Some(encoding);
    }

    /// Adds an accepted session and its forwards
    pub fn add_session(
        &mut self,
        session: SessionDescriptor,
        forwards: Vec<PortForwardDescriptor>,
    ) {
        if !forwards.is_empty() {
            self.result
                .port_forwards
                .insert(session.nickname.clone(), forwards);
        }
        self.result.sessions.push(session);
    }

    /// Adds a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.result.warnings.push(warning.into());
    }

    /// Adds field-level drops
    pub fn add_skipped_fields(&mut self, fields: impl IntoIterator<Item = SkippedField>) {
        self.result.skipped_fields.extend(fields);
    }

    /// Marks the result as truncated
    pub fn mark_truncated(&mut self) {
        self.result.truncated = true;
    }

    /// Number of sessions accepted so far
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.result.sessions.len()
    }

    /// Finishes the parse successfully
    #[must_use]
    pub fn finish(self) -> ParseResult {
        self.result
    }

    /// Aborts the parse, discarding sessions and forwards.
    ///
    /// Warnings and the detected encoding are kept for diagnostics.
    #[must_use]
    pub fn fail(self, error: ImportError) -> ParseResult {
        ParseResult {
            errors: vec![error],
            warnings: self.result.warnings,
            encoding: self.result.encoding,
            ..ParseResult::default()
        }
    }
}
