//! CLI error types.

use catalog_shared_types::CatalogError;

/// Errors raised by the command-line front end.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("Output error: {0}")]
    Output(String),
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(err.to_string())
    }
}

impl From<serde_yaml_ng::Error> for CliError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        CliError::Output(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
