//! Error types for the idmap CLI
//!
//! Messages are shown to users as is, so each one says what to do next.

use idmap_mapping::MappingError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Neither a canonical ID type name nor a known label
    #[error("Unknown ID type: '{0}'. Run 'idmap id-types' to list the supported types.")]
    UnknownIdType(String),

    #[error("Unknown organism: '{0}'. Use an NCBI taxonomy ID (e.g. 9606) or a name such as 'human' or 'mouse'.")]
    UnknownOrganism(String),

    #[error("No table translates '{id_type}' to '{target_id_type}' for organism {ncbi_tax_id}.")]
    NoTable {
        id_type: String,
        target_id_type: String,
        ncbi_tax_id: u32,
    },

    #[error("Cache error: {0}. Try 'idmap cache clean --all' to start from an empty cache.")]
    Cache(String),

    #[error("Configuration error: {0}. Check your config file and IDMAP_* environment variables.")]
    Config(String),

    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
