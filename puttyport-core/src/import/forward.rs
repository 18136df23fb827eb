//! Parser for PuTTY's `PortForwardings` value.
//!
//! The value is a comma separated list of entries:
//!
//! ```text
//! entry      := prefix? type spec
//! prefix     := "4" | "6"
//! type       := "L" | "R" | "D"
//! spec(L/R)  := [bindspec ":"] port "=" destspec
//! spec(D)    := [bindspec ":"] port
//! bindspec   := ipv4 | "[" ipv6 "]" | hostname
//! destspec   := hostspec ":" port
//! hostspec   := ipv4 | "[" ipv6 "]" | hostname
//! ```
//!
//! For example `L8080=localhost:80,4R1.2.3.4:9090=db:5432,6D[::1]:1080`.
//! Every entry is parsed on its own; a malformed entry is dropped without
//! affecting its siblings.

use crate::error::ForwardParseError;
use crate::models::{
    BIND_ALL_INTERFACES, BIND_IPV6_ANY, BIND_IPV6_LOOPBACK, BIND_LOCALHOST, ForwardDestination,
    ForwardKind, PortForwardDescriptor,
};

use super::validate::{is_valid_hostname, parse_port};

/// Address family requested by the optional `4`/`6` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressFamily {
    /// No prefix or `4`
    #[default]
    Ipv4,
    /// `6`
    Ipv6,
}

impl AddressFamily {
    /// Loopback address for this family
    #[must_use]
    pub const fn loopback(self) -> &'static str {
        match self {
            Self::Ipv4 => BIND_LOCALHOST,
            Self::Ipv6 => BIND_IPV6_LOOPBACK,
        }
    }

    /// Wildcard address for this family
    #[must_use]
    pub const fn wildcard(self) -> &'static str {
        match self {
            Self::Ipv4 => BIND_ALL_INTERFACES,
            Self::Ipv6 => BIND_IPV6_ANY,
        }
    }
}

/// Maps a parsed bind address onto the preferred family.
///
/// Missing addresses default to the family's loopback, loopback and wildcard
/// spellings of either family are translated, everything else is kept.
#[must_use]
pub fn normalize_bind_address(bind: Option<&str>, family: AddressFamily) -> String {
    match bind {
        None => family.loopback().to_string(),
        Some("0.0.0.0" | "::") => family.wildcard().to_string(),
        Some("127.0.0.1" | "localhost" | "::1") => family.loopback().to_string(),
        Some(other) => other.to_string(),
    }
}

/// An `address:port` token split into its parts.
#[derive(Debug, PartialEq, Eq)]
struct AddressPort<'a> {
    address: Option<&'a str>,
    port: &'a str,
}

/// Splits `addr:port`, `[v6]:port`, or a bare `port`.
///
/// Unbracketed tokens with more than one colon are rejected: an IPv6 address
/// without brackets cannot be told apart from its port.
fn split_address_port(spec: &str) -> Result<AddressPort<'_>, ForwardParseError> {
    if let Some(rest) = spec.strip_prefix('[') {
        let close = rest
            .find(']')
            .ok_or_else(|| ForwardParseError::MalformedAddress(spec.to_string()))?;
        let port = rest[close + 1..]
            .strip_prefix(':')
            .ok_or_else(|| ForwardParseError::MalformedAddress(spec.to_string()))?;
        return Ok(AddressPort {
            address: Some(&rest[..close]),
            port,
        });
    }

    match spec.matches(':').count() {
        0 => Ok(AddressPort {
            address: None,
            port: spec,
        }),
        1 => match spec.split_once(':') {
            Some((address, port)) if !address.is_empty() && !port.is_empty() => Ok(AddressPort {
                address: Some(address),
                port,
            }),
            _ => Err(ForwardParseError::MalformedAddress(spec.to_string())),
        },
        _ => Err(ForwardParseError::MalformedAddress(spec.to_string())),
    }
}

fn require_port(value: &str) -> Result<u16, ForwardParseError> {
    parse_port(value).ok_or_else(|| ForwardParseError::InvalidPort(value.to_string()))
}

/// Parses the listening side; an address that fails validation is dropped.
fn parse_listen_spec(spec: &str) -> Result<(Option<&str>, u16), ForwardParseError> {
    let AddressPort { address, port } = split_address_port(spec)?;
    let port = require_port(port)?;
    let address = address.filter(|addr| {
        let valid = is_valid_hostname(addr);
        if !valid {
            tracing::debug!(bind = %addr, "Ignoring invalid bind address");
        }
        valid
    });
    Ok((address, port))
}

fn parse_destination(spec: &str) -> Result<ForwardDestination, ForwardParseError> {
    if spec.is_empty() {
        return Err(ForwardParseError::MissingDestination);
    }
    let AddressPort { address, port } = split_address_port(spec)?;
    let host = address.ok_or_else(|| ForwardParseError::MalformedAddress(spec.to_string()))?;
    let port = require_port(port)?;
    if !is_valid_hostname(host) {
        return Err(ForwardParseError::InvalidHost(host.to_string()));
    }
    Ok(ForwardDestination {
        host: host.to_string(),
        port,
    })
}

/// Parses a single forwarding entry such as `4L127.0.0.1:8080=web:80`.
///
/// # Errors
///
/// Returns a [`ForwardParseError`] describing why the entry was rejected.
pub fn parse_port_forward(entry: &str) -> Result<PortForwardDescriptor, ForwardParseError> {
    let entry = entry.trim();
    let (family, body) = match entry.as_bytes().first() {
        Some(b'4') => (AddressFamily::Ipv4, &entry[1..]),
        Some(b'6') => (AddressFamily::Ipv6, &entry[1..]),
        Some(_) => (AddressFamily::Ipv4, entry),
        None => return Err(ForwardParseError::Empty),
    };

    let mut chars = body.chars();
    let letter = chars.next().ok_or(ForwardParseError::Empty)?;
    let kind = ForwardKind::from_letter(letter).ok_or(ForwardParseError::UnknownType(letter))?;
    let spec = chars.as_str();

    let (listen, destination) = if kind.requires_destination() {
        let (listen, dest) = spec
            .split_once('=')
            .ok_or(ForwardParseError::MissingDestination)?;
        (listen, Some(parse_destination(dest)?))
    } else {
        if spec.contains('=') {
            return Err(ForwardParseError::MalformedAddress(spec.to_string()));
        }
        (spec, None)
    };

    let (bind, source_port) = parse_listen_spec(listen)?;

    Ok(PortForwardDescriptor::new(
        kind,
        source_port,
        destination,
        normalize_bind_address(bind, family),
    ))
}

/// Outcome of parsing a whole `PortForwardings` value.
#[derive(Debug, Default)]
pub struct ForwardParseOutcome {
    /// Entries that parsed successfully, in input order
    pub forwards: Vec<PortForwardDescriptor>,
    /// Rejected entries with the reason
    pub rejected: Vec<(String, ForwardParseError)>,
}

/// Parses a comma separated forwarding list, keeping track of rejects.
#[must_use]
pub fn parse_port_forwards_detailed(spec: &str) -> ForwardParseOutcome {
    let mut outcome = ForwardParseOutcome::default();
    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match parse_port_forward(entry) {
            Ok(forward) => outcome.forwards.push(forward),
            Err(e) => {
                tracing::debug!(entry = %entry, error = %e, "Skipping port forward");
                outcome.rejected.push((entry.to_string(), e));
            }
        }
    }
    outcome
}

/// Parses a comma separated forwarding list, silently dropping bad entries.
#[must_use]
pub fn parse_port_forwards(spec: &str) -> Vec<PortForwardDescriptor> {
    parse_port_forwards_detailed(spec).forwards
}
