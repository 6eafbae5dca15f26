//! Command-line front end for the catalog registrar.
//!
//! Parses invocation parameters, connects to the catalog agent, applies the
//! requested state and renders the outcome.

pub mod args;
pub mod error;
pub mod output;

use std::process::ExitCode;

use anyhow::Context;
use tracing::debug;

use catalog_client::HttpCatalogClient;
use catalog_registrar::{CatalogRegistrar, RegistrationRequest};
use catalog_shared_types::Outcome;

pub use args::Cli;
pub use error::CliError;
pub use output::OutputFormat;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter(verbose: u8) -> String {
    let level = if verbose == 0 { "info" } else { "debug" };
    format!(
        "catalog_cli={level},catalog_registrar={level},catalog_client={level}",
        level = level
    )
}

/// Run one registrar invocation and return its outcome with the request it
/// was computed for.
pub async fn execute(cli: &Cli) -> anyhow::Result<(RegistrationRequest, Outcome)> {
    let request = cli.registration_request()?;

    let client = HttpCatalogClient::new(cli.client_config())
        .with_context(|| format!("failed to connect to {}:{}", cli.consul_host, cli.consul_port))?;
    debug!("Using catalog at {}", client.base_url());

    let registrar = CatalogRegistrar::new(client);
    let outcome = registrar.apply(&request).await.with_context(|| {
        format!(
            "failed to make node '{}' {} in datacenter '{}'",
            request.node.name, request.state, request.node.datacenter
        )
    })?;

    Ok((request, outcome))
}

/// Execute and render: returns the document for stdout and the exit status.
pub async fn run(cli: &Cli) -> (String, ExitCode) {
    let (request, outcome) = match execute(cli).await {
        Ok(result) => result,
        Err(e) => {
            let msg = format!("{:#}", e);
            output::error(&msg);
            return (output::render_failure(&msg, cli.output), ExitCode::FAILURE);
        }
    };

    match output::render_outcome(&outcome, &request, cli.output) {
        Ok(rendered) => {
            if cli.verbose > 0 {
                if outcome.changed {
                    output::success(&format!("Node '{}' is now {}", request.node.name, request.state));
                } else {
                    output::info(&format!("Node '{}' already {}", request.node.name, request.state));
                }
            }
            (rendered, ExitCode::SUCCESS)
        }
        Err(e) => {
            let msg = e.to_string();
            output::error(&msg);
            (output::render_failure(&msg, cli.output), ExitCode::FAILURE)
        }
    }
}
