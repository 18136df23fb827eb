//! PuTTY registry export importer.
//!
//! Reads a `regedit` export of `HKEY_CURRENT_USER\Software\SimonTatham\PuTTY\Sessions`
//! and returns the SSH sessions and port forwards it describes.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::ImportLimits;
use crate::error::ImportError;
use crate::trace_operation;
use crate::tracing::span_names;

use super::decode::{decode_with_detection, looks_like_registry_export};
use super::dedup::{GateDecision, SessionGate};
use super::result::{ParseResult, ParseResultBuilder};
use super::session::{build_session, keys};
use super::tokenizer::SectionTokenizer;
use super::validate::is_supported_protocol;

/// Importer for PuTTY registry exports.
#[derive(Debug, Clone, Default)]
pub struct PuttyImporter {
    limits: ImportLimits,
}

impl PuttyImporter {
    /// Creates an importer with the default 1 MiB / 100 session limits
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an importer with custom limits
    #[must_use]
    pub const fn with_limits(limits: ImportLimits) -> Self {
        Self { limits }
    }

    /// Limits applied by this importer
    #[must_use]
    pub const fn limits(&self) -> &ImportLimits {
        &self.limits
    }

    fn size_error(&self, declared_len: u64) -> Option<ImportError> {
        (declared_len > self.limits.max_file_size).then_some(ImportError::FileTooLarge {
            size: declared_len,
            limit: self.limits.max_file_size,
        })
    }

    /// Parses export bytes.
    ///
    /// `declared_len` is the size reported by whoever supplied the bytes (file
    /// metadata, HTTP header, ...). Inputs declared or found larger than the
    /// cap are refused before decoding.
    #[must_use]
    pub fn parse(&self, bytes: &[u8], declared_len: u64) -> ParseResult {
        let _span = trace_operation!(span_names::IMPORT_PARSE, declared_len).entered();

        let actual_len = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        if let Some(error) = self.size_error(declared_len.max(actual_len)) {
            tracing::warn!(declared_len, actual_len, "Registry export exceeds size limit");
            return ParseResult::fatal(error);
        }

        let (text, encoding) = decode_with_detection(bytes);
        tracing::debug!(%encoding, "Decoded registry export");

        let mut builder = ParseResultBuilder::new();
        builder.set_encoding(encoding);

        if !looks_like_registry_export(&text) {
            return builder.fail(ImportError::InvalidStructure);
        }

        self.collect_sessions(&text, builder)
    }

    fn collect_sessions(&self, text: &str, mut builder: ParseResultBuilder) -> ParseResult {
        let mut gate = SessionGate::new(self.limits.max_sessions);
        let mut section_count = 0usize;

        for section in SectionTokenizer::new(text) {
            section_count += 1;

            let protocol = section.string(keys::PROTOCOL).unwrap_or_default();
            if !is_supported_protocol(protocol) {
                tracing::debug!(session = %section.name, protocol, "Skipping non-SSH session");
                continue;
            }

            let Some(build) = build_session(&section) else {
                builder.add_warning(format!("Invalid session data skipped: {}", section.name));
                continue;
            };

            match gate.offer(&build.session.nickname) {
                GateDecision::Admitted => {}
                GateDecision::Duplicate => {
                    builder.add_warning(format!(
                        "Duplicate session name skipped: {}",
                        section.name
                    ));
                    continue;
                }
                GateDecision::LimitReached { first } => {
                    if first {
                        builder.mark_truncated();
                        builder.add_warning(format!(
                            "Too many sessions, imported first {}",
                            gate.limit()
                        ));
                    }
                    continue;
                }
            }

            for entry in &build.rejected_forwards {
                builder.add_warning(format!(
                    "Invalid port forward skipped in {}: {entry}",
                    build.session.nickname
                ));
            }
            builder.add_skipped_fields(build.skipped_fields);
            builder.add_session(build.session, build.forwards);
        }

        if section_count == 0 {
            return builder.fail(ImportError::NoSessions);
        }
        if builder.session_count() == 0 {
            return builder.fail(ImportError::NoValidSessions);
        }

        let result = builder.finish();
        tracing::info!(
            sessions = result.sessions.len(),
            forwards = result.forward_count(),
            warnings = result.warnings.len(),
            truncated = result.truncated,
            "Parsed PuTTY registry export"
        );
        result
    }

    /// Parses from a reader, reading at most one byte past the cap.
    ///
    /// Nothing is read when `declared_len` already exceeds the cap.
    pub fn parse_reader<R: Read>(&self, reader: R, declared_len: u64) -> ParseResult {
        if let Some(error) = self.size_error(declared_len) {
            return ParseResult::fatal(error);
        }

        let mut bytes = Vec::new();
        let cap = self.limits.max_file_size.saturating_add(1);
        if let Err(e) = reader.take(cap).read_to_end(&mut bytes) {
            return ParseResult::fatal(ImportError::Encoding(e.to_string()));
        }
        self.parse(&bytes, declared_len)
    }

    /// Parses an export file, using its metadata length as the declared size.
    #[must_use]
    pub fn import_from_path(&self, path: &Path) -> ParseResult {
        let io_error = |e: std::io::Error| ImportError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return ParseResult::fatal(io_error(e)),
        };
        let declared_len = match file.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => return ParseResult::fatal(io_error(e)),
        };
        self.parse_reader(file, declared_len)
    }
}
