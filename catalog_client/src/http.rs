//! Catalog backend speaking Consul's `/v1/catalog` REST API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;
use url::Url;

use catalog_api_interface::CatalogApi;
use catalog_shared_types::{
    CatalogError, CatalogNode, DeregisterRequest, RegisterRequest, Result,
};

use crate::config::ClientConfig;

const TOKEN_HEADER: &str = "X-Consul-Token";

/// HTTP client for one catalog agent.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    datacenter: String,
}

impl HttpCatalogClient {
    /// Build a client. Fails with `CatalogError::Connection` if the address is
    /// unusable or the underlying HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let mut builder = Client::builder().timeout(config.timeout);
        if !config.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder
            .build()
            .map_err(|e| CatalogError::Connection(format!("failed to build HTTP client: {}", e)))?;

        debug!("Catalog client ready for {}", base_url);

        Ok(Self {
            http,
            base_url,
            token: config.token().map(str::to_string),
            datacenter: config.datacenter,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured datacenter stands in for an empty one.
    fn resolve_datacenter<'b>(&'b self, datacenter: &'b str) -> &'b str {
        if datacenter.is_empty() {
            &self.datacenter
        } else {
            datacenter
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CatalogError::Connection(format!("invalid endpoint '{}': {}", path, e)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.authorize(request).send().await.map_err(|e| {
            if e.is_connect() {
                CatalogError::Connection(e.to_string())
            } else {
                CatalogError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(response)
    }

    async fn read_value(response: Response) -> Result<Value> {
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn list_nodes(&self, datacenter: &str) -> Result<Vec<CatalogNode>> {
        let url = self.endpoint("v1/catalog/nodes")?;
        let datacenter = self.resolve_datacenter(datacenter);
        debug!("GET {} (dc={})", url, datacenter);

        let response = self
            .send(self.http.get(url).query(&[("dc", datacenter)]))
            .await?;
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Value> {
        let url = self.endpoint("v1/catalog/register")?;
        let body = RegisterRequest {
            datacenter: self.resolve_datacenter(&request.datacenter).to_string(),
            ..request.clone()
        };
        debug!("PUT {} node={} dc={}", url, body.node, body.datacenter);

        let response = self.send(self.http.put(url).json(&body)).await?;
        Self::read_value(response).await
    }

    async fn deregister(&self, request: &DeregisterRequest) -> Result<Value> {
        let url = self.endpoint("v1/catalog/deregister")?;
        let body = DeregisterRequest::new(
            request.node.clone(),
            self.resolve_datacenter(&request.datacenter),
        );
        debug!("PUT {} node={} dc={}", url, body.node, body.datacenter);

        let response = self.send(self.http.put(url).json(&body)).await?;
        Self::read_value(response).await
    }
}
