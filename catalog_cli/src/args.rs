//! Command-line arguments.

use std::time::Duration;

use clap::{ArgAction, Parser};

use catalog_client::{ClientConfig, Scheme};
use catalog_registrar::RegistrationRequest;
use catalog_shared_types::{DesiredState, Node, Service, DEFAULT_DATACENTER};

use crate::error::Result;
use crate::output::OutputFormat;

#[derive(Parser, Debug, Clone)]
#[command(name = "consul-catalog")]
#[command(version)]
#[command(about = "Register and deregister nodes in the Consul catalog", long_about = None)]
pub struct Cli {
    /// The Consul endpoint to connect to
    #[arg(long, default_value = "localhost", env = "CONSUL_HOST")]
    pub consul_host: String,

    /// The Consul port to connect to
    #[arg(long, default_value_t = 8500, env = "CONSUL_PORT")]
    pub consul_port: u16,

    /// ACL token
    #[arg(long, default_value = "", env = "CONSUL_HTTP_TOKEN", hide_env_values = true)]
    pub token: String,

    /// The catalog node to add or remove
    #[arg(long)]
    pub node: String,

    /// The Consul datacenter to work with
    #[arg(long, default_value = DEFAULT_DATACENTER, env = "CONSUL_DATACENTER")]
    pub dc: String,

    /// The catalog node's address
    #[arg(long)]
    pub address: String,

    /// Scheme used to reach Consul (http or https)
    #[arg(long, default_value = "http", env = "CONSUL_SCHEME", value_parser = parse_scheme)]
    pub scheme: Scheme,

    /// Verify the Consul certificate when using https
    #[arg(long)]
    pub verify: bool,

    /// Whether the node should be present or absent
    #[arg(long, default_value = "present", value_parser = parse_state)]
    pub state: DesiredState,

    /// Service to register with the node, as a JSON object or Python-style dict literal
    #[arg(long)]
    pub service: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Output format for the result
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Log at debug level instead of info
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_scheme(s: &str) -> std::result::Result<Scheme, String> {
    s.parse().map_err(|e: catalog_shared_types::CatalogError| e.to_string())
}

fn parse_state(s: &str) -> std::result::Result<DesiredState, String> {
    s.parse().map_err(|e: catalog_shared_types::CatalogError| e.to_string())
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            host: self.consul_host.clone(),
            port: self.consul_port,
            scheme: self.scheme,
            token: self.token.clone(),
            datacenter: self.dc.clone(),
            verify: self.verify,
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// Build the registrar request, parsing the service descriptor if given.
    pub fn registration_request(&self) -> Result<RegistrationRequest> {
        let mut node = Node::new(&self.node, &self.address).with_datacenter(&self.dc);
        if let Some(raw) = &self.service {
            if let Some(service) = Service::parse_optional(raw)? {
                node = node.with_service(service);
            }
        }
        Ok(RegistrationRequest::new(node, self.state))
    }
}
