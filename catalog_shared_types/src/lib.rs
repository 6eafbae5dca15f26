//! Types shared by every crate of the catalog registrar.
//!
//! - [`Node`], [`Service`] and [`DesiredState`] describe what the operator asked for.
//! - [`CatalogNode`] is one entry of the remote node listing.
//! - [`RegisterRequest`] / [`DeregisterRequest`] are the catalog API payloads.
//! - [`Outcome`] is what every registrar operation reports back.

pub mod error;
mod literal;
pub mod node;
pub mod service;

pub use error::{CatalogError, Result};
pub use node::{
    CatalogNode, DeregisterRequest, DesiredState, Node, Outcome, RegisterRequest,
    DEFAULT_DATACENTER,
};
pub use service::Service;
