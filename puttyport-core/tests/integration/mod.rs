//! Integration test modules

mod parse_tests;
mod reconcile_tests;

/// Registry path prefix of PuTTY session keys
pub const SESSIONS_KEY: &str = "HKEY_CURRENT_USER\\Software\\SimonTatham\\PuTTY\\Sessions\\";

/// Standard regedit preamble
pub const PREAMBLE: &str = "Windows Registry Editor Version 5.00\r\n\r\n";

/// Builds one session section from `(key, raw value)` lines
pub fn section(encoded_name: &str, values: &[(&str, &str)]) -> String {
    let mut out = format!("[{SESSIONS_KEY}{encoded_name}]\r\n");
    for (key, value) in values {
        out.push_str(&format!("\"{key}\"={value}\r\n"));
    }
    out.push_str("\r\n");
    out
}

/// Builds a minimal SSH session section
pub fn ssh_section(encoded_name: &str, host: &str) -> String {
    section(
        encoded_name,
        &[("HostName", &format!("\"{host}\"")), ("Protocol", "\"ssh\"")],
    )
}
