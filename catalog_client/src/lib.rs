//! Catalog backends for the registrar.
//!
//! This crate provides implementations of the `CatalogApi` trait:
//! - `HttpCatalogClient`: talks to a Consul agent over its `/v1/catalog` REST API
//! - `MockCatalog`: in-memory catalog for testing (default)

pub mod config;
pub mod http;

#[cfg(feature = "mock-catalog")]
pub mod mock;

// Re-export common types
pub use catalog_api_interface::{CatalogApi, CatalogError};

pub use config::{ClientConfig, Scheme};
pub use http::HttpCatalogClient;

#[cfg(feature = "mock-catalog")]
pub use mock::{CallCounts, MockCatalog};
