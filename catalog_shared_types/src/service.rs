//! Service descriptor attached to a node at registration time.
//!
//! The catalog accepts a free-form `Service` object, so the descriptor is kept
//! as a JSON map and forwarded untouched. Operators supply it as a string,
//! either JSON or a Python-style dict literal such as
//! `{'Port': 5432, 'ID': 'db1_postgres', 'Service': 'postgres', 'Tags': ['v1', 'prod']}`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CatalogError, Result};
use crate::literal::parse_literal;

/// Opaque `Service` block of a catalog registration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Service(Map<String, Value>);

impl Service {
    /// Parse an optional service string. Blank input means no service.
    pub fn parse_optional(raw: &str) -> Result<Option<Service>> {
        if raw.trim().is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("ID").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.get("Service").and_then(Value::as_str)
    }

    pub fn port(&self) -> Option<u16> {
        self.0
            .get("Port")
            .and_then(Value::as_u64)
            .and_then(|p| u16::try_from(p).ok())
    }

    pub fn tags(&self) -> Vec<&str> {
        self.0
            .get("Tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl FromStr for Service {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::InvalidService("empty service definition".to_string()));
        }

        let value = match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => value,
            Err(_) => parse_literal(trimmed).map_err(|e| CatalogError::InvalidService(e.to_string()))?,
        };

        match value {
            Value::Object(fields) => Ok(Service(fields)),
            other => Err(CatalogError::InvalidService(format!(
                "expected an object, got {}",
                kind_of(&other)
            ))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
