//! Catalog registrar.
//!
//! Reconciles one node against a remote catalog:
//!
//! - `present`: the node (and its service, if any) is registered. Registration
//!   is always sent and always reported as a change; it is never compared
//!   with what the catalog already holds.
//! - `absent`: the node listing is fetched and the node is deregistered only
//!   if it appears there. A missing node is a no-op.
//!
//! Remote failures are returned to the caller as-is.

use tracing::{debug, info};

use catalog_api_interface::CatalogApi;
use catalog_shared_types::{
    DeregisterRequest, DesiredState, Node, Outcome, RegisterRequest, Result,
};

/// What the operator asked for: a node and whether it should exist.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRequest {
    pub node: Node,
    pub state: DesiredState,
}

impl RegistrationRequest {
    pub fn new(node: Node, state: DesiredState) -> Self {
        Self { node, state }
    }
}

/// Applies registration requests through a `CatalogApi` backend.
pub struct CatalogRegistrar<C> {
    catalog: C,
}

impl<C: CatalogApi> CatalogRegistrar<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Drive the catalog towards the requested state.
    pub async fn apply(&self, request: &RegistrationRequest) -> Result<Outcome> {
        match request.state {
            DesiredState::Present => self.register(&request.node).await,
            DesiredState::Absent => {
                self.deregister(&request.node.name, &request.node.datacenter)
                    .await
            }
        }
    }

    /// Register `node`. Always reports `changed`.
    pub async fn register(&self, node: &Node) -> Result<Outcome> {
        info!(
            node = %node.name,
            address = %node.address,
            datacenter = %node.datacenter,
            service = node.service.as_ref().and_then(|s| s.id().or_else(|| s.name())),
            "Registering node"
        );

        let response = self.catalog.register(&RegisterRequest::from(node)).await?;
        Ok(Outcome::changed(response))
    }

    /// Deregister `name` from `datacenter` if the catalog lists it.
    pub async fn deregister(&self, name: &str, datacenter: &str) -> Result<Outcome> {
        if !self.node_exists(name, datacenter).await? {
            info!(node = %name, datacenter = %datacenter, "Node not in catalog, nothing to deregister");
            return Ok(Outcome::unchanged());
        }

        info!(node = %name, datacenter = %datacenter, "Deregistering node");
        let response = self
            .catalog
            .deregister(&DeregisterRequest::new(name, datacenter))
            .await?;
        Ok(Outcome::changed(response))
    }

    /// Whether `name` appears in a fresh node listing of `datacenter`.
    pub async fn node_exists(&self, name: &str, datacenter: &str) -> Result<bool> {
        let nodes = self.catalog.list_nodes(datacenter).await?;
        let exists = nodes.iter().any(|n| n.node == name);
        debug!(
            node = %name,
            listed = nodes.len(),
            exists,
            "Checked node listing"
        );
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_client::{CallCounts, MockCatalog};
    use catalog_shared_types::{CatalogError, CatalogNode, Service};
    use serde_json::json;

    fn registrar() -> CatalogRegistrar<MockCatalog> {
        CatalogRegistrar::new(MockCatalog::new())
    }

    #[tokio::test]
    async fn test_deregister_missing_node_is_noop() {
        let registrar = registrar();
        registrar
            .catalog()
            .seed_node(CatalogNode::new("web1", "10.0.0.1", "dc1"))
            .await;

        let outcome = registrar.deregister("db1", "dc1").await.unwrap();

        assert_eq!(outcome, Outcome::unchanged());
        assert_eq!(registrar.catalog().calls().deregister, 0);
    }

    #[tokio::test]
    async fn test_deregister_existing_node() {
        let registrar = registrar();
        registrar
            .catalog()
            .seed_node(CatalogNode::new("db1", "10.0.0.5", "dc1"))
            .await;

        let outcome = registrar.deregister("db1", "dc1").await.unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.meta, json!(true));
        assert!(!registrar.node_exists("db1", "dc1").await.unwrap());
    }

    #[tokio::test]
    async fn test_node_match_is_exact() {
        let registrar = registrar();
        registrar
            .catalog()
            .seed_node(CatalogNode::new("db1.example.net", "10.0.0.5", "dc1"))
            .await;

        assert!(!registrar.node_exists("db1", "dc1").await.unwrap());
        assert!(!registrar.node_exists("DB1.example.net", "dc1").await.unwrap());
        assert!(registrar.node_exists("db1.example.net", "dc1").await.unwrap());
    }

    #[tokio::test]
    async fn test_deregister_is_scoped_to_datacenter() {
        let registrar = registrar();
        registrar
            .catalog()
            .seed_node(CatalogNode::new("db1", "10.0.0.5", "east"))
            .await;

        let outcome = registrar.deregister("db1", "dc1").await.unwrap();
        assert!(!outcome.changed);
        assert!(registrar.node_exists("db1", "east").await.unwrap());
    }

    #[tokio::test]
    async fn test_register_always_changes() {
        let registrar = registrar();
        let node = Node::new("db1", "10.0.0.5");

        let first = registrar.register(&node).await.unwrap();
        let second = registrar.register(&node).await.unwrap();

        assert!(first.changed);
        assert!(second.changed);
        assert_eq!(
            registrar.catalog().calls(),
            CallCounts {
                list_nodes: 0,
                register: 2,
                deregister: 0
            }
        );
    }

    #[tokio::test]
    async fn test_apply_present_registers_service() {
        let registrar = registrar();
        let service: Service = "{'ID': 'db1_postgres', 'Service': 'postgres', 'Port': 5432}"
            .parse()
            .unwrap();
        let request = RegistrationRequest::new(
            Node::new("db1", "10.0.0.5").with_service(service.clone()),
            DesiredState::Present,
        );

        let outcome = registrar.apply(&request).await.unwrap();

        assert!(outcome.changed);
        assert!(registrar.node_exists("db1", "dc1").await.unwrap());
        assert_eq!(registrar.catalog().services("dc1", "db1").await, vec![service]);
    }

    #[tokio::test]
    async fn test_apply_absent_round_trip() {
        let registrar = registrar();
        let node = Node::new("db1", "10.0.0.5");
        registrar
            .apply(&RegistrationRequest::new(node.clone(), DesiredState::Present))
            .await
            .unwrap();

        let removed = registrar
            .apply(&RegistrationRequest::new(node.clone(), DesiredState::Absent))
            .await
            .unwrap();
        let again = registrar
            .apply(&RegistrationRequest::new(node, DesiredState::Absent))
            .await
            .unwrap();

        assert!(removed.changed);
        assert!(!again.changed);
        assert_eq!(registrar.catalog().calls().deregister, 1);
    }

    #[tokio::test]
    async fn test_remote_failure_propagates() {
        let registrar = registrar();
        registrar.catalog().set_unavailable(true);

        let err = registrar.deregister("db1", "dc1").await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));

        let err = registrar.register(&Node::new("db1", "10.0.0.5")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }
}
