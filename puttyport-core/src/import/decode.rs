//! Byte-order-mark detection and text decoding for registry exports.
//!
//! `regedit` writes UTF-16LE with a BOM, PuTTY session managers and hand
//! edited files commonly use UTF-8 with or without a BOM. Decoding never
//! fails: undecodable input comes back as lossy text which the structural
//! check then rejects.

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Marker strings that identify a registry export
const REGISTRY_MARKERS: [&str; 2] = ["Windows Registry Editor", "REGEDIT4"];

/// Encoding that was actually used to produce the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectedEncoding {
    /// UTF-8 without BOM
    Utf8,
    /// UTF-8 with BOM
    Utf8Bom,
    /// UTF-16 little endian with BOM
    Utf16Le,
    /// UTF-16 big endian with BOM
    Utf16Be,
    /// Strict decoding failed, replacement characters were substituted
    Lossy,
}

impl std::fmt::Display for DetectedEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utf8 => write!(f, "UTF-8"),
            Self::Utf8Bom => write!(f, "UTF-8 (BOM)"),
            Self::Utf16Le => write!(f, "UTF-16LE"),
            Self::Utf16Be => write!(f, "UTF-16BE"),
            Self::Lossy => write!(f, "lossy"),
        }
    }
}

#[derive(Clone, Copy)]
enum Utf16Order {
    Little,
    Big,
}

fn utf16_units(bytes: &[u8], order: Utf16Order) -> impl Iterator<Item = u16> + '_ {
    bytes.chunks_exact(2).map(move |pair| match order {
        Utf16Order::Little => u16::from_le_bytes([pair[0], pair[1]]),
        Utf16Order::Big => u16::from_be_bytes([pair[0], pair[1]]),
    })
}

fn decode_utf16_strict(bytes: &[u8], order: Utf16Order) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    char::decode_utf16(utf16_units(bytes, order))
        .collect::<Result<String, _>>()
        .ok()
}

fn decode_utf16_lossy(bytes: &[u8], order: Utf16Order) -> String {
    char::decode_utf16(utf16_units(bytes, order))
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Decodes raw export bytes, reporting which encoding was used.
#[must_use]
pub fn decode_with_detection(bytes: &[u8]) -> (String, DetectedEncoding) {
    if let Some(body) = bytes.strip_prefix(&UTF8_BOM) {
        return match std::str::from_utf8(body) {
            Ok(text) => (text.to_string(), DetectedEncoding::Utf8Bom),
            Err(_) => (
                String::from_utf8_lossy(body).into_owned(),
                DetectedEncoding::Lossy,
            ),
        };
    } else if let Some(body) = bytes.strip_prefix(&UTF16_LE_BOM) {
        if let Some(text) = decode_utf16_strict(body, Utf16Order::Little) {
            return (text, DetectedEncoding::Utf16Le);
        }
        if let Ok(text) = std::str::from_utf8(bytes) {
            return (text.to_string(), DetectedEncoding::Utf8);
        }
        return (
            decode_utf16_lossy(body, Utf16Order::Little),
            DetectedEncoding::Lossy,
        );
    } else if let Some(body) = bytes.strip_prefix(&UTF16_BE_BOM) {
        if let Some(text) = decode_utf16_strict(body, Utf16Order::Big) {
            return (text, DetectedEncoding::Utf16Be);
        }
        if let Ok(text) = std::str::from_utf8(bytes) {
            return (text.to_string(), DetectedEncoding::Utf8);
        }
        return (
            decode_utf16_lossy(body, Utf16Order::Big),
            DetectedEncoding::Lossy,
        );
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), DetectedEncoding::Utf8),
        Err(_) => (
            String::from_utf8_lossy(bytes).into_owned(),
            DetectedEncoding::Lossy,
        ),
    }
}

/// Decodes raw export bytes into text.
#[must_use]
pub fn decode_registry_bytes(bytes: &[u8]) -> String {
    decode_with_detection(bytes).0
}

/// Cheap plausibility check run before the line scan.
///
/// Accepts text carrying a `regedit` header or at least one `[HKEY_...]`
/// section header.
#[must_use]
pub fn looks_like_registry_export(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    REGISTRY_MARKERS.iter().any(|marker| text.contains(marker)) || text.contains("[HKEY_")
}
