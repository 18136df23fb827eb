//! Property tests for registry export parsing

use proptest::prelude::*;
use puttyport_core::config::ImportLimits;
use puttyport_core::import::{GateDecision, PuttyImporter, SessionGate, decode_with_detection};

const HEADER: &str = "Windows Registry Editor Version 5.00\r\n\r\n";

// Strategy for generating session names that survive validation
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_-]{0,29}"
}

fn host_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9-]{0,15}\\.[a-z]{2,6}",
        "192\\.168\\.[0-9]{1,3}\\.[0-9]{1,3}",
    ]
}

fn export(sessions: &[(String, String)]) -> String {
    let mut text = HEADER.to_string();
    for (name, host) in sessions {
        text.push_str(&format!(
            "[HKEY_CURRENT_USER\\Software\\SimonTatham\\PuTTY\\Sessions\\{name}]\r\n\"HostName\"=\"{host}\"\r\n\"Protocol\"=\"ssh\"\r\n\r\n"
        ));
    }
    text
}

proptest! {
    /// Property: decoding and parsing arbitrary bytes never panics
    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_with_detection(&bytes);
        let result = PuttyImporter::new().parse(&bytes, bytes.len() as u64);
        // A fatal result never carries sessions
        if !result.errors.is_empty() {
            prop_assert!(result.sessions.is_empty());
            prop_assert!(result.port_forwards.is_empty());
        }
    }

    /// Property: accepted sessions never exceed the configured cap
    #[test]
    fn session_cap_respected(
        sessions in prop::collection::vec((name_strategy(), host_strategy()), 1..30),
        cap in 1usize..20,
    ) {
        let text = export(&sessions);
        let importer = PuttyImporter::with_limits(ImportLimits {
            max_file_size: 1024 * 1024,
            max_sessions: cap,
        });
        let result = importer.parse(text.as_bytes(), text.len() as u64);
        prop_assert!(result.sessions.len() <= cap);

        let mut gate = SessionGate::new(usize::MAX);
        let distinct = sessions
            .iter()
            .filter(|(name, _)| gate.offer(name) == GateDecision::Admitted)
            .count();
        prop_assert_eq!(result.sessions.len(), distinct.min(cap));
        prop_assert_eq!(result.truncated, distinct > cap);
    }

    /// Property: accepted session names are unique
    #[test]
    fn session_names_unique(
        sessions in prop::collection::vec((name_strategy(), host_strategy()), 1..40),
    ) {
        let text = export(&sessions);
        let result = PuttyImporter::new().parse(text.as_bytes(), text.len() as u64);
        let mut names: Vec<_> = result.sessions.iter().map(|s| s.nickname.clone()).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), before);
    }

    /// Property: UTF-16LE with BOM parses exactly like plain UTF-8
    #[test]
    fn utf16_matches_utf8(
        sessions in prop::collection::vec((name_strategy(), host_strategy()), 1..10),
    ) {
        let text = export(&sessions);
        let mut utf16 = vec![0xFF, 0xFE];
        utf16.extend(text.encode_utf16().flat_map(u16::to_le_bytes));

        let importer = PuttyImporter::new();
        let plain = importer.parse(text.as_bytes(), text.len() as u64);
        let wide = importer.parse(&utf16, utf16.len() as u64);
        prop_assert_eq!(plain.sessions, wide.sessions);
        prop_assert_eq!(plain.warnings, wide.warnings);
    }
}
