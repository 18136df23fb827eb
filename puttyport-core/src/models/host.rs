//! Destination store records.
//!
//! A [`HostRecord`] mixes fields that come from the PuTTY export with fields
//! only the destination application manages. The importer may overwrite the
//! former on re-import but must leave the latter alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::port_forward::{ForwardDestination, ForwardKind, PortForwardDescriptor};
use super::session::{AuthAgentUse, DEFAULT_SSH_PORT, SSH_PROTOCOL, SessionDescriptor};

/// Default terminal font size for new hosts
pub const DEFAULT_FONT_SIZE: u16 = 10;

/// Default host color for new hosts
pub const DEFAULT_COLOR: &str = "gray";

/// A host as persisted in the destination store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct HostRecord {
    /// Store identity
    pub id: Uuid,
    /// Display name, matched against imported session names
    pub nickname: String,
    /// Target host
    pub hostname: String,
    /// SSH port
    pub port: u16,
    /// Login user
    pub username: Option<String>,
    /// Protocol name
    pub protocol: String,
    /// SSH compression
    pub compression: bool,

    // Destination-owned settings below: never overwritten by an import update
    /// Host color in the host list
    pub color: String,
    /// Terminal font size
    pub font_size: u16,
    /// Reconnect automatically
    pub stay_connected: bool,
    /// Close the session without confirmation
    pub quick_disconnect: bool,
    /// Time of the last successful connection
    pub last_connected: Option<DateTime<Utc>>,
    /// Associated key in the destination key store
    pub pubkey_id: Option<Uuid>,
    /// Agent usage preference
    pub auth_agent: AuthAgentUse,
    /// Terminal character encoding
    pub encoding: String,
    /// What the delete key sends
    pub del_key: String,
    /// Whether to request an interactive shell
    pub want_session: bool,
    /// Command run after login
    pub post_login: Option<String>,
}

impl HostRecord {
    /// Creates a record with destination defaults and a fresh id
    #[must_use]
    pub fn new(nickname: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            nickname: nickname.into(),
            hostname: hostname.into(),
            port: DEFAULT_SSH_PORT,
            username: None,
            protocol: SSH_PROTOCOL.to_string(),
            compression: false,
            color: DEFAULT_COLOR.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            stay_connected: false,
            quick_disconnect: false,
            last_connected: None,
            pubkey_id: None,
            auth_agent: AuthAgentUse::default(),
            encoding: "UTF-8".to_string(),
            del_key: "del".to_string(),
            want_session: true,
            post_login: None,
        }
    }

    /// Builds a brand-new record from an imported session
    #[must_use]
    pub fn from_session(session: &SessionDescriptor) -> Self {
        let mut record = Self::new(session.nickname.clone(), session.hostname.clone());
        record.port = session.port;
        record.username.clone_from(&session.username);
        record.protocol.clone_from(&session.protocol);
        record.compression = session.compression;
        record.auth_agent = session.auth_agent;
        record.encoding.clone_from(&session.defaults.encoding);
        record.del_key.clone_from(&session.defaults.del_key);
        record.want_session = session.defaults.want_session;
        record.post_login.clone_from(&session.defaults.post_login);
        record
    }

    /// Returns a copy of this record with the export-sourced fields taken
    /// from `session`. Identity and destination-owned settings are kept.
    #[must_use]
    pub fn merged_with(&self, session: &SessionDescriptor) -> Self {
        Self {
            hostname: session.hostname.clone(),
            port: session.port,
            username: session.username.clone(),
            protocol: session.protocol.clone(),
            compression: session.compression,
            ..self.clone()
        }
    }
}

/// A port forward as persisted in the destination store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortForwardRecord {
    /// Store identity
    pub id: Uuid,
    /// Owning host
    pub host_id: Uuid,
    /// Display name
    pub nickname: String,
    /// Forward direction
    pub kind: ForwardKind,
    /// Listening port
    pub source_port: u16,
    /// Destination host, absent for dynamic forwards
    pub dest_addr: Option<String>,
    /// Destination port, `0` for dynamic forwards
    pub dest_port: u16,
    /// Listening address
    pub bind_address: String,
}

impl PortForwardRecord {
    /// Creates a store record from a descriptor owned by `host_id`
    #[must_use]
    pub fn from_descriptor(descriptor: &PortForwardDescriptor, host_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            host_id,
            nickname: descriptor.nickname(),
            kind: descriptor.kind,
            source_port: descriptor.source_port,
            dest_addr: descriptor.destination_host().map(str::to_string),
            dest_port: descriptor.destination_port(),
            bind_address: descriptor.bind_address.clone(),
        }
    }

    /// Converts the record back into a descriptor for comparison
    #[must_use]
    pub fn to_descriptor(&self) -> PortForwardDescriptor {
        let destination = self.dest_addr.as_ref().map(|host| ForwardDestination {
            host: host.clone(),
            port: self.dest_port,
        });
        PortForwardDescriptor {
            kind: self.kind,
            source_port: self.source_port,
            destination,
            bind_address: self.bind_address.clone(),
            host_id: Some(self.host_id),
        }
    }
}
