//! Output formatting for registrar results.
//!
//! The result document goes to stdout; status messages go to stderr so the
//! document stays machine-readable.

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled};

use catalog_registrar::RegistrationRequest;
use catalog_shared_types::Outcome;

use crate::error::Result;

/// Output format for the result document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
}

/// Document printed when the run fails.
#[derive(Debug, Serialize)]
pub struct Failure<'a> {
    pub failed: bool,
    pub msg: &'a str,
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Datacenter")]
    datacenter: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Changed")]
    changed: bool,
    #[tabled(rename = "Response")]
    response: String,
}

fn display_meta(meta: &Value) -> String {
    match meta {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render the outcome of a request in the chosen format.
pub fn render_outcome(
    outcome: &Outcome,
    request: &RegistrationRequest,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(outcome)?),
        OutputFormat::Table => {
            let row = OutcomeRow {
                node: request.node.name.clone(),
                datacenter: request.node.datacenter.clone(),
                state: request.state.to_string(),
                changed: outcome.changed,
                response: display_meta(&outcome.meta),
            };
            Ok(Table::new(vec![row]).to_string())
        }
    }
}

/// Render a failure document. Table output falls back to plain text.
pub fn render_failure(msg: &str, format: OutputFormat) -> String {
    let failure = Failure { failed: true, msg };
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&failure).ok(),
        OutputFormat::Yaml => serde_yaml_ng::to_string(&failure).ok(),
        OutputFormat::Table => None,
    };
    rendered.unwrap_or_else(|| format!("failed: {}", msg))
}

/// Print a success message.
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print an info message.
pub fn info(msg: &str) {
    eprintln!("{} {}", "→".blue(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg.red());
}
