//! Turns one registry section into a validated session.

use crate::models::{AuthAgentUse, PortForwardDescriptor, SessionDescriptor};

use super::forward::parse_port_forwards_detailed;
use super::result::{SkippedField, SkippedFieldReason};
use super::tokenizer::{RegistrySection, RegistryValue};
use super::validate::{is_valid_hostname, is_valid_session_name, is_valid_username, validate_port};

/// Registry value names read from a PuTTY session
pub mod keys {
    /// Target host
    pub const HOST_NAME: &str = "HostName";
    /// Login user
    pub const USER_NAME: &str = "UserName";
    /// SSH port
    pub const PORT_NUMBER: &str = "PortNumber";
    /// Connection protocol
    pub const PROTOCOL: &str = "Protocol";
    /// SSH compression flag
    pub const COMPRESSION: &str = "Compression";
    /// Agent usage flag
    pub const TRY_AGENT: &str = "TryAgent";
    /// Private key path
    pub const PUBLIC_KEY_FILE: &str = "PublicKeyFile";
    /// Forwarding list
    pub const PORT_FORWARDINGS: &str = "PortForwardings";
}

/// A session built from a section, plus everything that was left out.
#[derive(Debug, Clone)]
pub struct SessionBuild {
    /// The validated session
    pub session: SessionDescriptor,
    /// Forwards parsed from `PortForwardings`
    pub forwards: Vec<PortForwardDescriptor>,
    /// Fields dropped because their value was unusable
    pub skipped_fields: Vec<SkippedField>,
    /// Forwarding entries that failed to parse, verbatim
    pub rejected_forwards: Vec<String>,
}

fn parse_port_value(value: &RegistryValue) -> Result<u16, SkippedFieldReason> {
    let number = match value {
        RegistryValue::Dword(number) => *number,
        RegistryValue::String(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|_| SkippedFieldReason::InvalidValue)?,
    };
    validate_port(number).ok_or(SkippedFieldReason::OutOfRange)
}

/// Builds a session from a section.
///
/// Returns `None` when the name or hostname is unusable. Protocol filtering
/// happens before this is called. Other bad fields are dropped and reported
/// in [`SessionBuild::skipped_fields`].
#[must_use]
pub fn build_session(section: &RegistrySection) -> Option<SessionBuild> {
    let name = section.name.as_str();
    if !is_valid_session_name(name) {
        tracing::debug!(session = %name, "Rejecting session with invalid name");
        return None;
    }

    let Some(hostname) = section
        .string(keys::HOST_NAME)
        .filter(|host| is_valid_hostname(host))
    else {
        tracing::debug!(session = %name, "Rejecting session with missing or invalid hostname");
        return None;
    };

    let mut session = SessionDescriptor::new(name, hostname);
    let mut skipped_fields = Vec::new();

    match section.get(keys::USER_NAME) {
        Some(RegistryValue::String(user)) if user.is_empty() => {}
        Some(RegistryValue::String(user)) if is_valid_username(user) => {
            session.username = Some(user.clone());
        }
        Some(RegistryValue::String(user)) => skipped_fields.push(SkippedField::with_value(
            name,
            keys::USER_NAME,
            user.as_str(),
            SkippedFieldReason::InvalidValue,
        )),
        Some(other) => skipped_fields.push(SkippedField::with_value(
            name,
            keys::USER_NAME,
            other.to_text(),
            SkippedFieldReason::WrongType,
        )),
        None => {}
    }

    if let Some(value) = section.get(keys::PORT_NUMBER) {
        match parse_port_value(value) {
            Ok(port) => session.port = port,
            Err(reason) => skipped_fields.push(SkippedField::with_value(
                name,
                keys::PORT_NUMBER,
                value.to_text(),
                reason,
            )),
        }
    }

    session.compression = section.text(keys::COMPRESSION).as_deref() == Some("1");

    if let Some(value) = section.get(keys::TRY_AGENT) {
        session.auth_agent = match value {
            RegistryValue::Dword(flag) => AuthAgentUse::from_try_agent(*flag),
            RegistryValue::String(text) => text
                .trim()
                .parse::<u32>()
                .map_or(AuthAgentUse::Yes, AuthAgentUse::from_try_agent),
        };
    }

    session.public_key_file = section
        .string(keys::PUBLIC_KEY_FILE)
        .filter(|path| !path.is_empty())
        .map(str::to_string);

    let (forwards, rejected_forwards) = match section.string(keys::PORT_FORWARDINGS) {
        Some(spec) if !spec.is_empty() => {
            let outcome = parse_port_forwards_detailed(spec);
            let rejected = outcome.rejected.into_iter().map(|(entry, _)| entry).collect();
            (outcome.forwards, rejected)
        }
        _ => (Vec::new(), Vec::new()),
    };

    for field in &skipped_fields {
        tracing::debug!(
            session = %name,
            field = %field.field_name,
            reason = field.reason.description(),
            "Dropping session field"
        );
    }

    Some(SessionBuild {
        session,
        forwards,
        skipped_fields,
        rejected_forwards,
    })
}
