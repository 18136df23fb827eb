//! Field validation for imported session values.
//!
//! All predicates are total and side-effect free. Whether a failed check
//! rejects the whole session or only drops the field is decided by the
//! session builder.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::SSH_PROTOCOL;

/// Maximum session name length in characters
pub const MAX_SESSION_NAME_LEN: usize = 64;
/// Maximum hostname length in characters
pub const MAX_HOSTNAME_LEN: usize = 253;
/// Maximum username length in characters
pub const MAX_USERNAME_LEN: usize = 32;

/// Characters never allowed in a session name
pub const FORBIDDEN_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

static HOSTNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.-]+$").expect("HOSTNAME_REGEX is a valid regex pattern")
});

static IPV6_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[?[0-9A-Fa-f:]+\]?$").expect("IPV6_REGEX is a valid regex pattern")
});

/// Checks a decoded session name.
#[must_use]
pub fn is_valid_session_name(name: &str) -> bool {
    let len = name.chars().count();
    if len == 0 || len > MAX_SESSION_NAME_LEN || name.trim().is_empty() {
        return false;
    }
    !name
        .chars()
        .any(|c| c.is_control() || FORBIDDEN_NAME_CHARS.contains(&c))
}

/// Checks a hostname, IPv4 address, or (optionally bracketed) IPv6 address.
#[must_use]
pub fn is_valid_hostname(hostname: &str) -> bool {
    let len = hostname.chars().count();
    if len == 0 || len > MAX_HOSTNAME_LEN || hostname.trim().is_empty() {
        return false;
    }
    HOSTNAME_REGEX.is_match(hostname) || IPV6_REGEX.is_match(hostname)
}

/// Checks a username: at most 32 printable ASCII characters.
#[must_use]
pub fn is_valid_username(username: &str) -> bool {
    username.chars().count() <= MAX_USERNAME_LEN
        && username.chars().all(|c| matches!(c, ' '..='~'))
}

/// Returns the port if it lies in `1..=65535`.
#[must_use]
pub fn validate_port(port: u32) -> Option<u16> {
    u16::try_from(port).ok().filter(|&p| p != 0)
}

/// Parses a decimal port string and validates its range.
#[must_use]
pub fn parse_port(value: &str) -> Option<u16> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<u32>().ok().and_then(validate_port)
}

/// Returns true for the only protocol this importer handles.
#[must_use]
pub fn is_supported_protocol(protocol: &str) -> bool {
    protocol == SSH_PROTOCOL
}
