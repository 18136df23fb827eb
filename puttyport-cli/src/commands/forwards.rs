//! Forwards command: parse a `PortForwardings` value on its own.

use std::fmt::Write as _;

use puttyport_core::import::forward::parse_port_forwards_detailed;
use puttyport_core::models::PortForwardDescriptor;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::util::to_json;

/// Forwards command handler
pub fn cmd_forwards(spec: &str, format: OutputFormat) -> Result<(), CliError> {
    let outcome = parse_port_forwards_detailed(spec);

    for (entry, error) in &outcome.rejected {
        eprintln!("Warning: skipped '{entry}': {error}");
    }

    match format {
        OutputFormat::Table => println!("{}", format_table(&outcome.forwards)),
        OutputFormat::Json => println!("{}", to_json(&outcome.forwards)?),
    }
    Ok(())
}

/// Format forwards as a table string
#[must_use]
pub fn format_table(forwards: &[PortForwardDescriptor]) -> String {
    if forwards.is_empty() {
        return "No port forwards found.".to_string();
    }

    let mut output = String::new();
    let bind_width = forwards
        .iter()
        .map(|f| f.bind_address.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let _ = writeln!(
        output,
        "{:<6}  {:<7}  {:<bind_width$}  {:<5}  DESTINATION",
        "NAME", "TYPE", "BIND", "PORT"
    );
    for forward in forwards {
        let destination = forward.destination.as_ref().map_or_else(
            || "-".to_string(),
            |d| format!("{}:{}", d.host, d.port),
        );
        let _ = writeln!(
            output,
            "{:<6}  {:<7}  {:<bind_width$}  {:<5}  {destination}",
            forward.nickname(),
            forward.kind.to_string(),
            forward.bind_address,
            forward.source_port
        );
    }

    output.trim_end().to_string()
}
