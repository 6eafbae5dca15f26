//! In-memory catalog used by tests and dry runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use catalog_api_interface::CatalogApi;
use catalog_shared_types::{
    CatalogError, CatalogNode, DeregisterRequest, RegisterRequest, Result, Service,
};

#[derive(Debug, Clone)]
struct MockEntry {
    node: CatalogNode,
    services: BTreeMap<String, Service>,
}

/// Number of calls received per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_nodes: usize,
    pub register: usize,
    pub deregister: usize,
}

/// Catalog kept in memory, keyed by datacenter then node name.
#[derive(Debug, Default)]
pub struct MockCatalog {
    nodes: RwLock<HashMap<String, BTreeMap<String, MockEntry>>>,
    list_calls: AtomicUsize,
    register_calls: AtomicUsize,
    deregister_calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a node straight into the catalog without counting a register call.
    pub async fn seed_node(&self, node: CatalogNode) {
        let mut nodes = self.nodes.write().await;
        nodes.entry(node.datacenter.clone()).or_default().insert(
            node.node.clone(),
            MockEntry {
                node,
                services: BTreeMap::new(),
            },
        );
    }

    /// Make every following call fail as if the agent were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            list_nodes: self.list_calls.load(Ordering::SeqCst),
            register: self.register_calls.load(Ordering::SeqCst),
            deregister: self.deregister_calls.load(Ordering::SeqCst),
        }
    }

    /// Services registered on a node, ordered by service ID.
    pub async fn services(&self, datacenter: &str, node: &str) -> Vec<Service> {
        let nodes = self.nodes.read().await;
        nodes
            .get(datacenter)
            .and_then(|dc| dc.get(node))
            .map(|entry| entry.services.values().cloned().collect())
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Http("mock catalog unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for MockCatalog {
    async fn list_nodes(&self, datacenter: &str) -> Result<Vec<CatalogNode>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let nodes = self.nodes.read().await;
        Ok(nodes
            .get(datacenter)
            .map(|dc| dc.values().map(|entry| entry.node.clone()).collect())
            .unwrap_or_default())
    }

    async fn register(&self, request: &RegisterRequest) -> Result<Value> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        debug!("MockCatalog: registering {} in {}", request.node, request.datacenter);

        let mut nodes = self.nodes.write().await;
        let entry = nodes
            .entry(request.datacenter.clone())
            .or_default()
            .entry(request.node.clone())
            .or_insert_with(|| MockEntry {
                node: CatalogNode::new(&request.node, &request.address, &request.datacenter),
                services: BTreeMap::new(),
            });
        entry.node.address = request.address.clone();

        if let Some(service) = &request.service {
            let key = service
                .id()
                .or_else(|| service.name())
                .unwrap_or_default()
                .to_string();
            entry.services.insert(key, service.clone());
        }

        Ok(Value::Bool(true))
    }

    async fn deregister(&self, request: &DeregisterRequest) -> Result<Value> {
        self.deregister_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        debug!("MockCatalog: deregistering {} in {}", request.node, request.datacenter);

        let mut nodes = self.nodes.write().await;
        if let Some(dc) = nodes.get_mut(&request.datacenter) {
            dc.remove(&request.node);
        }

        Ok(Value::Bool(true))
    }
}
