//! Node-level types: what the operator wants, and what the catalog reports.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;
use crate::service::Service;

/// Datacenter used when none is given.
pub const DEFAULT_DATACENTER: &str = "dc1";

/// Whether a node should be in the catalog or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    #[default]
    Present,
    Absent,
}

impl DesiredState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesiredState::Present => "present",
            DesiredState::Absent => "absent",
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DesiredState {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(DesiredState::Present),
            "absent" => Ok(DesiredState::Absent),
            other => Err(CatalogError::InvalidArgument(format!(
                "state must be 'present' or 'absent', got '{}'",
                other
            ))),
        }
    }
}

/// A node as requested by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node name, the identity used for existence checks.
    pub name: String,
    pub address: String,
    pub datacenter: String,
    /// Service registered alongside the node, if any.
    pub service: Option<Service>,
}

impl Node {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            datacenter: DEFAULT_DATACENTER.to_string(),
            service: None,
        }
    }

    pub fn with_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.datacenter = datacenter.into();
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }
}

/// One entry of `GET /v1/catalog/nodes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogNode {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Node")]
    pub node: String,
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "Datacenter", default)]
    pub datacenter: String,
    #[serde(rename = "TaggedAddresses", default)]
    pub tagged_addresses: Option<HashMap<String, String>>,
    #[serde(rename = "Meta", default)]
    pub meta: Option<HashMap<String, String>>,
}

impl CatalogNode {
    pub fn new(node: impl Into<String>, address: impl Into<String>, datacenter: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            node: node.into(),
            address: address.into(),
            datacenter: datacenter.into(),
            tagged_addresses: None,
            meta: None,
        }
    }
}

/// Body of `PUT /v1/catalog/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "Datacenter")]
    pub datacenter: String,
    #[serde(rename = "Node")]
    pub node: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Service", skip_serializing_if = "Option::is_none", default)]
    pub service: Option<Service>,
}

impl From<&Node> for RegisterRequest {
    fn from(node: &Node) -> Self {
        Self {
            datacenter: node.datacenter.clone(),
            node: node.name.clone(),
            address: node.address.clone(),
            service: node.service.clone(),
        }
    }
}

/// Body of `PUT /v1/catalog/deregister`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeregisterRequest {
    #[serde(rename = "Datacenter")]
    pub datacenter: String,
    #[serde(rename = "Node")]
    pub node: String,
}

impl DeregisterRequest {
    pub fn new(node: impl Into<String>, datacenter: impl Into<String>) -> Self {
        Self {
            datacenter: datacenter.into(),
            node: node.into(),
        }
    }
}

/// Result of a registrar operation.
///
/// `meta` carries the raw catalog response, or `null` when nothing was sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub changed: bool,
    pub meta: Value,
}

impl Outcome {
    pub fn changed(meta: Value) -> Self {
        Self {
            changed: true,
            meta,
        }
    }

    pub fn unchanged() -> Self {
        Self {
            changed: false,
            meta: Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_desired_state_parse() {
        assert_eq!("present".parse::<DesiredState>().unwrap(), DesiredState::Present);
        assert_eq!("ABSENT".parse::<DesiredState>().unwrap(), DesiredState::Absent);
        assert_eq!(DesiredState::default(), DesiredState::Present);
        assert!(matches!(
            "gone".parse::<DesiredState>(),
            Err(CatalogError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_catalog_node_deserialize() {
        let json = r#"{
            "ID": "40e4a748-2192-161a-0510-9bf59fe950b5",
            "Node": "db1.example.net",
            "Address": "10.0.0.5",
            "Datacenter": "dc1",
            "TaggedAddresses": null,
            "Meta": {"env": "prod"},
            "CreateIndex": 12,
            "ModifyIndex": 14
        }"#;

        let node: CatalogNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.node, "db1.example.net");
        assert_eq!(node.address, "10.0.0.5");
        assert!(node.tagged_addresses.is_none());
        assert_eq!(node.meta.unwrap().get("env").map(String::as_str), Some("prod"));
    }

    #[test]
    fn test_register_request_omits_missing_service() {
        let node = Node::new("web1", "10.0.0.1").with_datacenter("east");
        let body = serde_json::to_value(RegisterRequest::from(&node)).unwrap();
        assert_eq!(
            body,
            json!({"Datacenter": "east", "Node": "web1", "Address": "10.0.0.1"})
        );
    }

    #[test]
    fn test_register_request_carries_service() {
        let service: Service = r#"{"ID": "web1_http", "Service": "http", "Port": 80}"#.parse().unwrap();
        let node = Node::new("web1", "10.0.0.1").with_service(service);
        let body = serde_json::to_value(RegisterRequest::from(&node)).unwrap();
        assert_eq!(body["Datacenter"], "dc1");
        assert_eq!(body["Service"]["Port"], 80);
    }

    #[test]
    fn test_outcome_serialize() {
        let outcome = Outcome::unchanged();
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"changed": false, "meta": null})
        );
        assert!(Outcome::changed(json!(true)).changed);
    }
}
