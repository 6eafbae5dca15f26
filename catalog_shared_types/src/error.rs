//! Error type shared across the catalog crates.

/// Errors raised while talking to the catalog or preparing a request for it.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Catalog API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to decode catalog response: {0}")]
    Decode(String),

    #[error("Invalid service definition: {0}")]
    InvalidService(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CatalogError {
    /// Whether this error happened before any request reached the catalog.
    pub fn is_connection(&self) -> bool {
        matches!(self, CatalogError::Connection(_))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
