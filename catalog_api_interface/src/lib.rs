//! The seam between the registrar and a concrete catalog backend.

use async_trait::async_trait;
use serde_json::Value;

use catalog_shared_types::{CatalogNode, DeregisterRequest, RegisterRequest, Result};

pub use catalog_shared_types::CatalogError;

/// Remote catalog operations the registrar relies on.
///
/// Implementations return the raw response body of register/deregister so it
/// can be reported back to the operator unchanged.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List every node registered in `datacenter`.
    async fn list_nodes(&self, datacenter: &str) -> Result<Vec<CatalogNode>>;

    /// Register a node, and its service if present.
    async fn register(&self, request: &RegisterRequest) -> Result<Value>;

    /// Remove a node and everything attached to it.
    async fn deregister(&self, request: &DeregisterRequest) -> Result<Value>;
}
