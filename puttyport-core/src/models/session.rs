//! Session descriptor produced by the registry parser.

use serde::{Deserialize, Serialize};

/// Default SSH port used when the export carries none or an invalid one
pub const DEFAULT_SSH_PORT: u16 = 22;

/// The only protocol imported from PuTTY exports
pub const SSH_PROTOCOL: &str = "ssh";

/// How the destination should use a running SSH agent for this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthAgentUse {
    /// Never consult the agent
    No,
    /// Use the agent without asking
    #[default]
    Yes,
}

impl AuthAgentUse {
    /// Maps PuTTY's `TryAgent` dword onto the destination preference.
    ///
    /// PuTTY only distinguishes on/off; `0` disables the agent and any other
    /// value enables it.
    #[must_use]
    pub const fn from_try_agent(value: u32) -> Self {
        if value == 0 { Self::No } else { Self::Yes }
    }

    /// Returns the stored representation of this preference
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Yes => "yes",
        }
    }
}

impl std::fmt::Display for AuthAgentUse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination settings PuTTY has no analogue for.
///
/// These are fixed values; they are never inferred from the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDefaults {
    /// Terminal character encoding
    pub encoding: String,
    /// What the delete key sends (`del` or `backspace`)
    pub del_key: String,
    /// Whether to request an interactive shell
    pub want_session: bool,
    /// Command run after login
    pub post_login: Option<String>,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            encoding: "UTF-8".to_string(),
            del_key: "del".to_string(),
            want_session: true,
            post_login: None,
        }
    }
}

/// A validated SSH session extracted from one registry section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    /// Session name, unique within one import
    pub nickname: String,
    /// Target host (FQDN, IPv4, or IPv6 literal)
    pub hostname: String,
    /// Login user, absent when missing or not printable ASCII
    pub username: Option<String>,
    /// SSH port
    pub port: u16,
    /// Always [`SSH_PROTOCOL`]
    pub protocol: String,
    /// Whether SSH compression is requested
    pub compression: bool,
    /// Agent usage preference
    pub auth_agent: AuthAgentUse,
    /// Private key path as written in the export, not resolved
    pub public_key_file: Option<String>,
    /// Pass-through destination defaults
    pub defaults: SessionDefaults,
}

impl SessionDescriptor {
    /// Creates a session with default port, no user, and default settings
    #[must_use]
    pub fn new(nickname: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            hostname: hostname.into(),
            username: None,
            port: DEFAULT_SSH_PORT,
            protocol: SSH_PROTOCOL.to_string(),
            compression: false,
            auth_agent: AuthAgentUse::default(),
            public_key_file: None,
            defaults: SessionDefaults::default(),
        }
    }

    /// Returns `user@host:port` for display purposes
    #[must_use]
    pub fn display_target(&self) -> String {
        let host = if self.hostname.contains(':') && !self.hostname.starts_with('[') {
            format!("[{}]", self.hostname)
        } else {
            self.hostname.clone()
        };
        match &self.username {
            Some(user) => format!("{user}@{host}:{}", self.port),
            None => format!("{host}:{}", self.port),
        }
    }
}
