//! Port forward descriptors.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Loopback bind address when IPv4 is preferred
pub const BIND_LOCALHOST: &str = "localhost";
/// Wildcard bind address when IPv4 is preferred
pub const BIND_ALL_INTERFACES: &str = "0.0.0.0";
/// Loopback bind address when IPv6 is preferred
pub const BIND_IPV6_LOOPBACK: &str = "::1";
/// Wildcard bind address when IPv6 is preferred
pub const BIND_IPV6_ANY: &str = "::";

/// Direction of a forwarded port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForwardKind {
    /// Listen locally, connect from the server (`-L`)
    Local,
    /// Listen on the server, connect from the client (`-R`)
    Remote,
    /// SOCKS proxy listening locally (`-D`)
    Dynamic,
}

impl ForwardKind {
    /// Parses PuTTY's single-letter type code
    #[must_use]
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'L' => Some(Self::Local),
            'R' => Some(Self::Remote),
            'D' => Some(Self::Dynamic),
            _ => None,
        }
    }

    /// Returns PuTTY's single-letter type code
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Local => 'L',
            Self::Remote => 'R',
            Self::Dynamic => 'D',
        }
    }

    /// Returns true if forwards of this kind need a fixed destination
    #[must_use]
    pub const fn requires_destination(self) -> bool {
        !matches!(self, Self::Dynamic)
    }
}

impl std::fmt::Display for ForwardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// Fixed destination of a local or remote forward.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForwardDestination {
    /// Destination host, IPv6 literals without brackets
    pub host: String,
    /// Destination port
    pub port: u16,
}

/// One forwarded port parsed from a `PortForwardings` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortForwardDescriptor {
    /// Forward direction
    pub kind: ForwardKind,
    /// Listening port
    pub source_port: u16,
    /// Fixed destination, `None` only for dynamic forwards
    pub destination: Option<ForwardDestination>,
    /// Address the listener binds to
    pub bind_address: String,
    /// Owning host in the destination store, unknown until import
    pub host_id: Option<Uuid>,
}

impl PortForwardDescriptor {
    /// Creates a local or remote forward
    #[must_use]
    pub fn new(
        kind: ForwardKind,
        source_port: u16,
        destination: Option<ForwardDestination>,
        bind_address: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source_port,
            destination,
            bind_address: bind_address.into(),
            host_id: None,
        }
    }

    /// Returns a copy owned by the given destination host
    #[must_use]
    pub fn with_host(&self, host_id: Uuid) -> Self {
        Self {
            host_id: Some(host_id),
            ..self.clone()
        }
    }

    /// Returns a copy listening on a different address
    #[must_use]
    pub fn with_bind_address(&self, bind_address: impl Into<String>) -> Self {
        Self {
            bind_address: bind_address.into(),
            ..self.clone()
        }
    }

    /// Short label such as `L8080` used as the forward's display name
    #[must_use]
    pub fn nickname(&self) -> String {
        format!("{}{}", self.kind.letter(), self.source_port)
    }

    /// Destination host, if any
    #[must_use]
    pub fn destination_host(&self) -> Option<&str> {
        self.destination.as_ref().map(|d| d.host.as_str())
    }

    /// Destination port, `0` for dynamic forwards
    #[must_use]
    pub fn destination_port(&self) -> u16 {
        self.destination.as_ref().map_or(0, |d| d.port)
    }

    /// Identity used when comparing forward sets: bind address and owner are
    /// not part of it.
    #[must_use]
    pub fn comparison_key(&self) -> (ForwardKind, u16, Option<String>, u16) {
        (
            self.kind,
            self.source_port,
            self.destination_host().map(str::to_string),
            self.destination_port(),
        )
    }
}

impl std::fmt::Display for PortForwardDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bind = if self.bind_address.contains(':') {
            format!("[{}]", self.bind_address)
        } else {
            self.bind_address.clone()
        };
        write!(f, "{} {bind}:{}", self.kind, self.source_port)?;
        if let Some(dest) = &self.destination {
            if dest.host.contains(':') {
                write!(f, " -> [{}]:{}", dest.host, dest.port)?;
            } else {
                write!(f, " -> {}:{}", dest.host, dest.port)?;
            }
        }
        Ok(())
    }
}
