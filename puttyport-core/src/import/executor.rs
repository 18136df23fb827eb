//! Writes an [`ImportPlan`] into a [`HostStore`].

use crate::config::BindAddressChoice;
use crate::error::StoreResult;
use crate::models::PortForwardRecord;
use crate::store::HostStore;
use crate::trace_operation;
use crate::tracing::span_names;

use super::reconcile::{Classification, ImportPlan, PlannedImport};

/// Outcome of an executed import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Sessions written (created or updated)
    pub imported: usize,
    /// Sessions that failed to write
    pub skipped: usize,
    /// Sessions left alone because nothing changed
    pub unchanged: usize,
    /// One message per failed session
    pub failures: Vec<String>,
}

impl ImportSummary {
    /// Returns true if every session was handled
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped == 0
    }
}

impl std::fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported: {}, Unchanged: {}, Skipped: {}",
            self.imported, self.unchanged, self.skipped
        )
    }
}

/// Applies plans to a store, one session at a time.
///
/// A failing session is counted and the rest continue. Writes already made
/// are not rolled back.
#[derive(Debug, Clone, Default)]
pub struct ImportExecutor {
    bind_override: Option<String>,
}

impl ImportExecutor {
    /// Creates an executor, optionally forcing every forward's bind address
    #[must_use]
    pub fn new(bind_override: Option<String>) -> Self {
        Self { bind_override }
    }

    /// Creates an executor from the configured bind choice
    #[must_use]
    pub fn from_choice(choice: &BindAddressChoice) -> Self {
        Self::new(choice.override_address().map(str::to_string))
    }

    /// The forced bind address, if any
    #[must_use]
    pub fn bind_override(&self) -> Option<&str> {
        self.bind_override.as_deref()
    }

    /// Writes every new or updated entry of `plan` into `store`.
    pub fn execute<S: HostStore + ?Sized>(&self, plan: &ImportPlan, store: &mut S) -> ImportSummary {
        let _span = trace_operation!(span_names::IMPORT_EXECUTE, entries = plan.total()).entered();
        let mut summary = ImportSummary::default();

        for entry in &plan.entries {
            if matches!(entry.classification, Classification::Unchanged { .. }) {
                summary.unchanged += 1;
                continue;
            }
            match self.write_entry(entry, store) {
                Ok(()) => summary.imported += 1,
                Err(e) => {
                    tracing::warn!(
                        session = %entry.session.nickname,
                        error = %e,
                        "Failed to import session"
                    );
                    summary.skipped += 1;
                    summary
                        .failures
                        .push(format!("{}: {e}", entry.session.nickname));
                }
            }
        }

        tracing::info!(
            imported = summary.imported,
            unchanged = summary.unchanged,
            skipped = summary.skipped,
            "Import finished"
        );
        summary
    }

    /// Upserts the host, then replaces its forwards wholesale.
    fn write_entry<S: HostStore + ?Sized>(
        &self,
        entry: &PlannedImport,
        store: &mut S,
    ) -> StoreResult<()> {
        let host = store.upsert_host(entry.target.clone())?;

        for old in store.forwards_for_host(host.id)? {
            store.delete_forward(old.id)?;
        }

        for forward in &entry.forwards {
            let bound = forward.with_host(host.id);
            let bound = match &self.bind_override {
                Some(bind) => bound.with_bind_address(bind.as_str()),
                None => bound,
            };
            store.insert_forward(PortForwardRecord::from_descriptor(&bound, host.id))?;
        }

        tracing::debug!(
            session = %entry.session.nickname,
            host = %host.hostname,
            forwards = entry.forwards.len(),
            "Wrote session"
        );
        Ok(())
    }
}
