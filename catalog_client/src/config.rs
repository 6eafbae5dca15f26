//! Connection settings for the catalog endpoint.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use catalog_shared_types::{CatalogError, Result, DEFAULT_DATACENTER};

/// Scheme used to reach the catalog agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(CatalogError::InvalidArgument(format!(
                "scheme must be 'http' or 'https', got '{}'",
                other
            ))),
        }
    }
}

/// Configuration for `HttpCatalogClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub scheme: Scheme,
    /// ACL token; empty means anonymous.
    pub token: String,
    /// Datacenter used by `HttpCatalogClient` when a call passes an empty one.
    pub datacenter: String,
    /// Verify the server certificate when using https.
    pub verify: bool,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8500,
            scheme: Scheme::Http,
            token: String::new(),
            datacenter: DEFAULT_DATACENTER.to_string(),
            verify: false,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Root URL of the agent, e.g. `http://localhost:8500/`.
    pub fn base_url(&self) -> Result<Url> {
        let raw = format!("{}://{}:{}/", self.scheme, self.host, self.port);
        Url::parse(&raw)
            .map_err(|e| CatalogError::Connection(format!("invalid catalog address '{}': {}", raw, e)))
    }

    pub fn token(&self) -> Option<&str> {
        if self.token.is_empty() {
            None
        } else {
            Some(&self.token)
        }
    }
}
