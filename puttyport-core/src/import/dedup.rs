//! Duplicate-name and session-count enforcement.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Default cap on sessions accepted from one export
pub const MAX_SESSIONS: usize = 100;

/// Outcome of offering a session name to the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Name is new and the cap has room
    Admitted,
    /// An equivalent name was already admitted
    Duplicate,
    /// The cap is reached; `first` is true only for the first refusal
    LimitReached {
        /// Whether this is the first session refused by the cap
        first: bool,
    },
}

/// Admits sessions in file order, first occurrence wins.
///
/// Names are compared after NFC normalization, so `café` written with a
/// precomposed `é` and with `e` + combining acute count as the same name.
#[derive(Debug)]
pub struct SessionGate {
    seen: HashSet<String>,
    limit: usize,
    truncated: bool,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new(MAX_SESSIONS)
    }
}

impl SessionGate {
    /// Creates a gate admitting at most `limit` sessions
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            seen: HashSet::new(),
            limit,
            truncated: false,
        }
    }

    /// NFC form used for comparisons
    #[must_use]
    pub fn normalize(name: &str) -> String {
        name.nfc().collect()
    }

    /// Offers a validated session name
    pub fn offer(&mut self, name: &str) -> GateDecision {
        let normalized = Self::normalize(name);
        if self.seen.contains(&normalized) {
            return GateDecision::Duplicate;
        }
        if self.seen.len() >= self.limit {
            let first = !self.truncated;
            self.truncated = true;
            return GateDecision::LimitReached { first };
        }
        self.seen.insert(normalized);
        GateDecision::Admitted
    }

    /// Number of admitted sessions
    #[must_use]
    pub fn admitted(&self) -> usize {
        self.seen.len()
    }

    /// Returns true once a session has been refused by the cap
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// The configured cap
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}
