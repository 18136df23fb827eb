//! Line-oriented scanner for `regedit` exports.
//!
//! [`SectionTokenizer`] walks the decoded text once and yields one
//! [`RegistrySection`] per PuTTY session key. Sections outside the PuTTY
//! sessions key are skipped, and a malformed line only affects the key it
//! appears on.

use std::collections::HashMap;
use std::str::Lines;
use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;

/// Registry path under which PuTTY stores saved sessions
pub const PUTTY_SESSIONS_PATH: &str = "HKEY_CURRENT_USER\\Software\\SimonTatham\\PuTTY\\Sessions\\";

static VALUE_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^"([^"]+)"=(.+)$"#).expect("VALUE_LINE_REGEX is a valid regex pattern")
});

static DWORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^dword:([0-9a-fA-F]{8})$").expect("DWORD_REGEX is a valid regex pattern")
});

/// A typed registry value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryValue {
    /// `dword:xxxxxxxx`
    Dword(u32),
    /// `"..."` with regedit escapes removed
    String(String),
}

impl RegistryValue {
    /// Renders the value as text: dwords in decimal, strings verbatim
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Dword(value) => value.to_string(),
            Self::String(value) => value.clone(),
        }
    }
}

/// Classifies the right-hand side of a `"Key"=value` line.
///
/// Returns `None` for value types the importer does not understand
/// (`hex:`, `hex(2):`, unquoted text, ...).
#[must_use]
pub fn parse_registry_value(raw: &str) -> Option<RegistryValue> {
    if let Some(caps) = DWORD_REGEX.captures(raw) {
        return u32::from_str_radix(&caps[1], 16)
            .ok()
            .map(RegistryValue::Dword);
    }

    let inner = raw.strip_prefix('"')?.strip_suffix('"')?;
    Some(RegistryValue::String(unescape_regedit_string(inner)))
}

/// Undoes regedit's `\\` and `\"` escaping.
fn unescape_regedit_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('\\' | '"')) => out.push(next),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Percent-decodes a PuTTY session key name.
///
/// PuTTY escapes spaces and special characters as `%XX`. Returns `None` when
/// an escape is truncated or not hexadecimal, or when the decoded bytes are
/// not UTF-8.
#[must_use]
pub fn decode_session_name(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3)?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(std::borrow::Cow::into_owned)
}

/// One PuTTY session key and its values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySection {
    /// Decoded session name
    pub name: String,
    values: HashMap<String, RegistryValue>,
    /// Value lines inside the section that could not be understood
    pub dropped_lines: usize,
}

impl RegistrySection {
    /// Creates an empty section
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
            dropped_lines: 0,
        }
    }

    /// Sets a value, replacing any earlier value for the same key
    pub fn insert(&mut self, key: impl Into<String>, value: RegistryValue) {
        self.values.insert(key.into(), value);
    }

    /// Raw typed value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RegistryValue> {
        self.values.get(key)
    }

    /// String value, `None` for dwords
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(RegistryValue::String(value)) => Some(value),
            _ => None,
        }
    }

    /// Dword value, `None` for strings
    #[must_use]
    pub fn dword(&self, key: &str) -> Option<u32> {
        match self.values.get(key) {
            Some(RegistryValue::Dword(value)) => Some(*value),
            _ => None,
        }
    }

    /// Value rendered as text regardless of its type
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.values.get(key).map(RegistryValue::to_text)
    }

    /// Number of values held
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the section has no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

enum Header {
    Session(String),
    Other,
}

fn classify_header(line: &str) -> Option<Header> {
    let inner = line.strip_prefix('[')?.strip_suffix(']')?;
    let Some(encoded) = inner.strip_prefix(PUTTY_SESSIONS_PATH) else {
        return Some(Header::Other);
    };
    // Sub-keys of a session (e.g. `...\Sessions\foo\SshHostKeys`) are not sessions
    if encoded.is_empty() || encoded.contains('\\') {
        return Some(Header::Other);
    }
    match decode_session_name(encoded) {
        Some(name) => Some(Header::Session(name)),
        None => {
            tracing::debug!(section = %encoded, "Discarding section with undecodable name");
            Some(Header::Other)
        }
    }
}

/// Lazy scanner yielding PuTTY session sections in file order.
///
/// Create a new tokenizer over the same text to restart the scan.
pub struct SectionTokenizer<'a> {
    lines: Lines<'a>,
    current: Option<RegistrySection>,
}

impl<'a> SectionTokenizer<'a> {
    /// Creates a tokenizer over decoded export text.
    ///
    /// A leading byte order mark left over from decoding is ignored.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.strip_prefix('\u{feff}').unwrap_or(text).lines(),
            current: None,
        }
    }
}

/// Adds one `"Key"=value` line to the open section, if any.
fn absorb_value_line(current: &mut Option<RegistrySection>, line: &str) {
    let Some(section) = current.as_mut() else {
        return;
    };
    let parsed = VALUE_LINE_REGEX
        .captures(line)
        .and_then(|caps| Some((caps[1].to_string(), parse_registry_value(&caps[2])?)));
    match parsed {
        Some((key, value)) => section.insert(key, value),
        None => section.dropped_lines += 1,
    }
}

impl Iterator for SectionTokenizer<'_> {
    type Item = RegistrySection;

    fn next(&mut self) -> Option<Self::Item> {
        for raw in self.lines.by_ref() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }

            if let Some(header) = classify_header(line) {
                let finished = self.current.take();
                if let Header::Session(name) = header {
                    self.current = Some(RegistrySection::new(name));
                }
                if finished.is_some() {
                    return finished;
                }
                continue;
            }

            absorb_value_line(&mut self.current, line);
        }

        self.current.take()
    }
}
