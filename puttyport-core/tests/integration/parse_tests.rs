//! End-to-end parsing of registry exports

use puttyport_core::ImportError;
use puttyport_core::import::{DetectedEncoding, PuttyImporter};
use puttyport_core::models::{AuthAgentUse, ForwardKind};
use tempfile::TempDir;

use super::{PREAMBLE, section, ssh_section};

fn parse(text: &str) -> puttyport_core::ParseResult {
    PuttyImporter::new().parse(text.as_bytes(), text.len() as u64)
}

fn sample_export() -> String {
    format!(
        "{PREAMBLE}{}{}{}",
        section(
            "My%20Server",
            &[
                ("HostName", "\"example.com\""),
                ("UserName", "\"admin\""),
                ("PortNumber", "dword:00000016"),
                ("Protocol", "\"ssh\""),
                ("Compression", "dword:00000001"),
                ("TryAgent", "dword:00000000"),
                ("PublicKeyFile", "\"C:\\\\Users\\\\me\\\\.ssh\\\\id.ppk\""),
                (
                    "PortForwardings",
                    "\"L1022=192.168.168.128:22,L1023=192.168.168.128:5900,L64734=127.0.0.1:64734\"",
                ),
            ],
        ),
        section(
            "Test%20Server",
            &[
                ("HostName", "\"test.local\""),
                ("UserName", "\"user\""),
                ("PortNumber", "dword:00000922"),
                ("Protocol", "\"ssh\""),
            ],
        ),
        section(
            "Telnet%20Box",
            &[("HostName", "\"legacy.local\""), ("Protocol", "\"telnet\"")],
        )
    )
}

fn utf16le(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
    bytes
}

fn utf16be(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    bytes
}

#[test]
fn test_sample_export() {
    let result = parse(&sample_export());
    assert!(result.is_success(), "{:?}", result.errors);
    assert_eq!(result.sessions.len(), 2);
    assert!(result.warnings.is_empty());
    assert!(!result.truncated);

    let server = result.session("My Server").expect("My Server parsed");
    assert_eq!(server.hostname, "example.com");
    assert_eq!(server.username.as_deref(), Some("admin"));
    assert_eq!(server.port, 22);
    assert!(server.compression);
    assert_eq!(server.auth_agent, AuthAgentUse::No);
    assert_eq!(
        server.public_key_file.as_deref(),
        Some("C:\\Users\\me\\.ssh\\id.ppk")
    );

    let forwards = result.forwards("My Server");
    let ports: Vec<u16> = forwards.iter().map(|f| f.source_port).collect();
    assert_eq!(ports, vec![1022, 1023, 64734]);
    assert!(forwards.iter().all(|f| f.kind == ForwardKind::Local));
    assert_eq!(forwards[1].destination_port(), 5900);
    assert_eq!(forwards[2].destination_host(), Some("127.0.0.1"));

    let test = result.session("Test Server").expect("Test Server parsed");
    assert_eq!(test.port, 2338);
    assert!(result.session("Telnet Box").is_none());
}

#[test]
fn test_encodings_give_identical_results() {
    let text = format!(
        "{PREAMBLE}{}",
        section(
            "caf%C3%A9",
            &[
                ("HostName", "\"ex.example.com\""),
                ("Protocol", "\"ssh\""),
                ("PortForwardings", "\"L8080=localhost:80\""),
            ],
        )
    );

    let mut utf8_bom = vec![0xEF, 0xBB, 0xBF];
    utf8_bom.extend_from_slice(text.as_bytes());

    let importer = PuttyImporter::new();
    let plain = importer.parse(text.as_bytes(), text.len() as u64);
    assert_eq!(plain.encoding, Some(DetectedEncoding::Utf8));

    for (bytes, encoding) in [
        (utf8_bom, DetectedEncoding::Utf8Bom),
        (utf16le(&text), DetectedEncoding::Utf16Le),
        (utf16be(&text), DetectedEncoding::Utf16Be),
    ] {
        let result = importer.parse(&bytes, bytes.len() as u64);
        assert_eq!(result.encoding, Some(encoding));
        assert_eq!(result.sessions, plain.sessions, "{encoding}");
        assert_eq!(result.port_forwards, plain.port_forwards, "{encoding}");
        assert_eq!(result.warnings, plain.warnings, "{encoding}");
    }
    assert_eq!(plain.sessions[0].nickname, "café");
}

#[test]
fn test_utf8_bom_with_invalid_byte_keeps_first_session() {
    let text = ssh_section("a", "x.example.com");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0xFF);

    let result = PuttyImporter::new().parse(&bytes, bytes.len() as u64);
    assert!(result.is_success(), "{:?}", result.errors);
    assert_eq!(result.encoding, Some(DetectedEncoding::Lossy));
    assert_eq!(result.sessions.len(), 1);
    assert_eq!(result.sessions[0].nickname, "a");
}

#[test]
fn test_size_cap_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.reg");
    let mut content = format!("{PREAMBLE}{}", ssh_section("a", "a.example.com"));
    content.push_str(&";".repeat(1024 * 1024));
    std::fs::write(&path, &content).unwrap();

    let result = PuttyImporter::new().import_from_path(&path);
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(
        result.errors[0],
        ImportError::FileTooLarge {
            limit: 1_048_576,
            ..
        }
    ));
    assert!(result.sessions.is_empty());
    assert!(result.encoding.is_none());
}

#[test]
fn test_file_on_disk_within_cap() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sessions.reg");
    std::fs::write(&path, sample_export()).unwrap();
    let result = PuttyImporter::new().import_from_path(&path);
    assert_eq!(result.sessions.len(), 2);
}

#[test]
fn test_exactly_at_cap_is_accepted() {
    let mut content = format!("{PREAMBLE}{}", ssh_section("a", "a.example.com"));
    let padding = 1024 * 1024 - content.len();
    content.push_str(&" ".repeat(padding));
    assert_eq!(content.len(), 1024 * 1024);
    let result = parse(&content);
    assert!(result.is_success(), "{:?}", result.errors);
}

#[test]
fn test_truncation_at_100() {
    let mut text = PREAMBLE.to_string();
    for i in 0..105 {
        text.push_str(&ssh_section(&format!("Session{i}"), &format!("h{i}.example.com")));
    }
    let result = parse(&text);
    assert_eq!(result.sessions.len(), 100);
    assert!(result.truncated);
    let cap_warnings: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.contains("100"))
        .collect();
    assert_eq!(cap_warnings.len(), 1);
    assert_eq!(cap_warnings[0], "Too many sessions, imported first 100");
}

#[test]
fn test_nfc_duplicates_first_wins() {
    let text = format!(
        "{PREAMBLE}{}{}",
        ssh_section("caf%C3%A9", "first.example.com"),
        ssh_section("cafe%CC%81", "second.example.com")
    );
    let result = parse(&text);
    assert_eq!(result.sessions.len(), 1);
    assert_eq!(result.sessions[0].hostname, "first.example.com");
    assert_eq!(
        result.warnings,
        vec!["Duplicate session name skipped: cafe\u{301}".to_string()]
    );
}

#[test]
fn test_name_and_hostname_length_limits() {
    let ok_name = "A".repeat(64);
    let long_name = "B".repeat(65);
    let ok_host = format!("{}.example.com", "a".repeat(241));
    let long_host = format!("{}.example.com", "a".repeat(242));
    let text = format!(
        "{PREAMBLE}{}{}{}{}",
        ssh_section(&ok_name, "h.example.com"),
        ssh_section(&long_name, "h.example.com"),
        ssh_section("okhost", &ok_host),
        ssh_section("longhost", &long_host)
    );
    let result = parse(&text);
    let names: Vec<_> = result.sessions.iter().map(|s| s.nickname.as_str()).collect();
    assert_eq!(names, vec![ok_name.as_str(), "okhost"]);
    assert_eq!(result.warnings.len(), 2);
    assert!(result.warnings.iter().all(|w| w.starts_with("Invalid session data skipped")));
}

#[test]
fn test_port_boundaries() {
    let text = format!(
        "{PREAMBLE}{}{}{}{}",
        section("p1", &[("HostName", "\"h\""), ("Protocol", "\"ssh\""), ("PortNumber", "dword:00000001")]),
        section("pmax", &[("HostName", "\"h\""), ("Protocol", "\"ssh\""), ("PortNumber", "dword:0000ffff")]),
        section("p0", &[("HostName", "\"h\""), ("Protocol", "\"ssh\""), ("PortNumber", "dword:00000000")]),
        section("pbig", &[("HostName", "\"h\""), ("Protocol", "\"ssh\""), ("PortNumber", "dword:00010000")]),
    );
    let result = parse(&text);
    let ports: Vec<u16> = result.sessions.iter().map(|s| s.port).collect();
    assert_eq!(ports, vec![1, 65535, 22, 22]);
    assert_eq!(result.skipped_fields.len(), 2);
}

#[test]
fn test_forward_examples() {
    let text = format!(
        "{PREAMBLE}{}{}",
        section(
            "mixed",
            &[
                ("HostName", "\"h\""),
                ("Protocol", "\"ssh\""),
                ("PortForwardings", "\"L8080=localhost:80,R9090=0.0.0.0:443,D1080\""),
            ],
        ),
        section(
            "v6",
            &[
                ("HostName", "\"h\""),
                ("Protocol", "\"ssh\""),
                ("PortForwardings", "\"6L[::1]:8080=localhost:80\""),
            ],
        )
    );
    let result = parse(&text);

    let mixed = result.forwards("mixed");
    let kinds: Vec<_> = mixed.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![ForwardKind::Local, ForwardKind::Remote, ForwardKind::Dynamic]
    );
    assert_eq!(mixed[0].destination_host(), Some("localhost"));
    assert_eq!(mixed[1].destination_host(), Some("0.0.0.0"));
    assert_eq!(mixed[1].destination_port(), 443);
    assert!(mixed[2].destination.is_none());

    let v6 = result.forwards("v6");
    assert_eq!(v6.len(), 1);
    assert_eq!(v6[0].bind_address, "::1");
}

#[test]
fn test_corrupted_values_do_not_abort() {
    let text = format!(
        "{PREAMBLE}{}{}",
        section(
            "corrupted",
            &[
                ("HostName", "invalid_value_format"),
                ("PortNumber", "not_a_number"),
                ("Protocol", "\"ssh\""),
            ],
        ),
        ssh_section("fine", "fine.example.com")
    );
    let result = parse(&text);
    assert_eq!(result.sessions.len(), 1);
    assert_eq!(result.sessions[0].nickname, "fine");
    assert_eq!(result.warnings, vec!["Invalid session data skipped: corrupted"]);
}

#[test]
fn test_fatal_errors() {
    let result = parse("");
    assert_eq!(result.errors, vec![ImportError::InvalidStructure]);

    let result = parse("random text without markers");
    assert_eq!(result.errors, vec![ImportError::InvalidStructure]);

    let result = parse(&format!("{PREAMBLE}[HKEY_CURRENT_USER\\Software\\Other]\r\n"));
    assert_eq!(result.errors, vec![ImportError::NoSessions]);
    assert_eq!(result.errors[0].to_string(), "No PuTTY SSH sessions found");

    let result = parse(&format!(
        "{PREAMBLE}{}",
        section("bad%2Fname", &[("HostName", "\"h\""), ("Protocol", "\"ssh\"")])
    ));
    assert_eq!(result.errors, vec![ImportError::NoValidSessions]);
    assert_eq!(result.errors[0].to_string(), "No valid SSH sessions found");
    assert!(result.sessions.is_empty());
    assert!(result.port_forwards.is_empty());
}
