//! Parse command: list the sessions in a registry export.

use std::fmt::Write as _;
use std::path::Path;

use puttyport_core::ParseResult;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::{load_settings, parse_export, to_json};

/// Parse command handler
pub fn cmd_parse(
    config_path: Option<&Path>,
    quiet: bool,
    file: &Path,
    format: OutputFormat,
) -> Result<(), CliError> {
    let (_, settings) = load_settings(config_path)?;
    let result = parse_export(file, &settings, quiet)?;

    match format {
        OutputFormat::Table => {
            println!("{}", format_table(&result));
            if !quiet {
                println!("\n{}", result.summary());
            }
        }
        OutputFormat::Json => println!("{}", to_json(&ParseOutput::from(&result))?),
    }
    Ok(())
}

/// Format parsed sessions as a table string
#[must_use]
pub fn format_table(result: &ParseResult) -> String {
    if result.sessions.is_empty() {
        return "No sessions found.".to_string();
    }

    let mut output = String::new();
    let name_width = result
        .sessions
        .iter()
        .map(|s| s.nickname.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let target_width = result
        .sessions
        .iter()
        .map(|s| s.display_target().len())
        .max()
        .unwrap_or(6)
        .max(6);

    let _ = writeln!(
        output,
        "{:<name_width$}  {:<target_width$}  FORWARDS",
        "NAME", "TARGET"
    );
    let _ = writeln!(output, "{:-<name_width$}  {:-<target_width$}  --------", "", "");

    for session in &result.sessions {
        let _ = writeln!(
            output,
            "{:<name_width$}  {:<target_width$}  {}",
            session.nickname,
            session.display_target(),
            result.forwards(&session.nickname).len()
        );
    }

    output.trim_end().to_string()
}

/// JSON shape of one parsed session
#[derive(Debug, Serialize)]
pub struct SessionOutput {
    pub name: String,
    pub host: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub compression: bool,
    pub auth_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_file: Option<String>,
    pub forwards: Vec<String>,
}

/// JSON shape of a whole parse
#[derive(Debug, Serialize)]
pub struct ParseOutput {
    pub sessions: Vec<SessionOutput>,
    pub warnings: Vec<String>,
    pub truncated: bool,
}

impl From<&ParseResult> for ParseOutput {
    fn from(result: &ParseResult) -> Self {
        let sessions = result
            .sessions
            .iter()
            .map(|s| SessionOutput {
                name: s.nickname.clone(),
                host: s.hostname.clone(),
                port: s.port,
                username: s.username.clone(),
                compression: s.compression,
                auth_agent: s.auth_agent.to_string(),
                public_key_file: s.public_key_file.clone(),
                forwards: result
                    .forwards(&s.nickname)
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            })
            .collect();
        Self {
            sessions,
            warnings: result.warnings.clone(),
            truncated: result.truncated,
        }
    }
}
