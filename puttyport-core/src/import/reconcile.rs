//! Classification of parsed sessions against the destination store.
//!
//! Each session is matched to a stored host by exact nickname and
//! classified as new, updated, or unchanged. An [`ImportPlan`] collects the
//! classifications so callers can preview what an import will write.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{HostRecord, PortForwardDescriptor, PortForwardRecord, SessionDescriptor};
use crate::store::HostStore;
use crate::trace_operation;
use crate::tracing::span_names;

use super::result::ParseResult;

/// How an incoming session relates to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No stored host has this nickname
    New,
    /// A stored host has this nickname but differs
    Updated {
        /// Id of the stored host
        existing_id: Uuid,
    },
    /// A stored host has this nickname and identical imported fields
    Unchanged {
        /// Id of the stored host
        existing_id: Uuid,
    },
}

impl Classification {
    /// Id of the matched host, if any
    #[must_use]
    pub const fn existing_id(&self) -> Option<Uuid> {
        match self {
            Self::New => None,
            Self::Updated { existing_id } | Self::Unchanged { existing_id } => Some(*existing_id),
        }
    }

    /// Short label for listings
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Updated { .. } => "updated",
            Self::Unchanged { .. } => "unchanged",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn host_fields_match(existing: &HostRecord, incoming: &SessionDescriptor) -> bool {
    existing.hostname == incoming.hostname
        && existing.port == incoming.port
        && existing.username == incoming.username
        && existing.protocol == incoming.protocol
        && existing.compression == incoming.compression
}

/// Compares forward sets as unordered multisets.
///
/// Bind addresses do not take part in the comparison.
#[must_use]
pub fn forwards_match(existing: &[PortForwardRecord], incoming: &[PortForwardDescriptor]) -> bool {
    if existing.len() != incoming.len() {
        return false;
    }
    let mut stored: Vec<_> = existing
        .iter()
        .map(|record| record.to_descriptor().comparison_key())
        .collect();
    let mut parsed: Vec<_> = incoming
        .iter()
        .map(PortForwardDescriptor::comparison_key)
        .collect();
    stored.sort_unstable();
    parsed.sort_unstable();
    stored == parsed
}

/// Classifies one incoming session.
///
/// `existing_forwards` may hold forwards of any host; only those owned by
/// the matched host are compared.
#[must_use]
pub fn classify(
    existing: &[HostRecord],
    existing_forwards: &[PortForwardRecord],
    session: &SessionDescriptor,
    forwards: &[PortForwardDescriptor],
) -> Classification {
    let Some(host) = existing.iter().find(|h| h.nickname == session.nickname) else {
        return Classification::New;
    };

    let owned: Vec<PortForwardRecord> = existing_forwards
        .iter()
        .filter(|f| f.host_id == host.id)
        .cloned()
        .collect();

    if host_fields_match(host, session) && forwards_match(&owned, forwards) {
        Classification::Unchanged {
            existing_id: host.id,
        }
    } else {
        Classification::Updated {
            existing_id: host.id,
        }
    }
}

/// Applies an incoming session to a stored host.
///
/// Only export-sourced fields change; identity and destination-owned
/// settings are kept.
#[must_use]
pub fn merge_into_existing(existing: &HostRecord, incoming: &SessionDescriptor) -> HostRecord {
    existing.merged_with(incoming)
}

/// Which parsed sessions to import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Every parsed session
    #[default]
    All,
    /// Only the named sessions
    Only(HashSet<String>),
}

impl Selection {
    /// Selects the given session names
    #[must_use]
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    /// Returns true if the session is selected
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(name),
        }
    }
}

/// One session scheduled for import.
#[derive(Debug, Clone)]
pub struct PlannedImport {
    /// The parsed session
    pub session: SessionDescriptor,
    /// Its relation to the store
    pub classification: Classification,
    /// Parsed forwards, not yet bound to a host
    pub forwards: Vec<PortForwardDescriptor>,
    /// Host record to write: the stored host merged with the session for
    /// matches, a fresh record otherwise. Its id is fixed at planning time.
    pub target: HostRecord,
}

/// Preview of an import before anything is written.
#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    /// Selected sessions in parse order
    pub entries: Vec<PlannedImport>,
    /// Sessions that will create hosts
    pub new_count: usize,
    /// Sessions that will update hosts
    pub update_count: usize,
    /// Sessions identical to their stored host
    pub unchanged_count: usize,
}

impl ImportPlan {
    /// Builds a plan from a parse result and a snapshot of the store.
    #[must_use]
    pub fn build(
        result: &ParseResult,
        hosts: &[HostRecord],
        forwards: &[PortForwardRecord],
        selection: &Selection,
    ) -> Self {
        let _span = trace_operation!(
            span_names::IMPORT_RECONCILE,
            sessions = result.sessions.len(),
            stored_hosts = hosts.len()
        )
        .entered();

        let mut plan = Self::default();
        for session in result
            .sessions
            .iter()
            .filter(|s| selection.contains(&s.nickname))
        {
            let parsed = result.forwards(&session.nickname);
            let classification = classify(hosts, forwards, session, parsed);
            match classification {
                Classification::New => plan.new_count += 1,
                Classification::Updated { .. } => plan.update_count += 1,
                Classification::Unchanged { .. } => plan.unchanged_count += 1,
            }
            let target = classification
                .existing_id()
                .and_then(|id| hosts.iter().find(|h| h.id == id))
                .map_or_else(
                    || HostRecord::from_session(session),
                    |existing| merge_into_existing(existing, session),
                );

            tracing::debug!(
                session = %session.nickname,
                classification = %classification,
                "Classified session"
            );
            plan.entries.push(PlannedImport {
                session: session.clone(),
                classification,
                forwards: parsed.to_vec(),
                target,
            });
        }
        plan
    }

    /// Builds a plan after snapshotting `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn from_store<S: HostStore + ?Sized>(
        result: &ParseResult,
        store: &S,
        selection: &Selection,
    ) -> StoreResult<Self> {
        let hosts = store.hosts()?;
        let mut forwards = Vec::new();
        for host in &hosts {
            forwards.extend(store.forwards_for_host(host.id)?);
        }
        Ok(Self::build(result, &hosts, &forwards, selection))
    }

    /// Total number of selected sessions
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing would be written
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.new_count == 0 && self.update_count == 0
    }

    /// Returns a one-line summary of the plan
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "New: {}, Updated: {}, Unchanged: {}",
            self.new_count, self.update_count, self.unchanged_count
        )
    }
}
