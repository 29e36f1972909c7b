//! Error types for identifier mapping
//!
//! A missing translation is never an error: every lookup reports a miss as an
//! empty set. The variants here cover caller misuse, unavailable backends and
//! garbled backend data.

use thiserror::Error;

/// Result type alias for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level failure (connection refused, TLS, timeout)
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but not with a success status
    #[error("Request to {url} failed with status {status}")]
    Network { url: String, status: u16 },

    #[error("ID mapping job submission failed: {0}")]
    JobSubmission(String),

    /// The ID mapping service reported explicit failure messages for a job
    #[error("ID mapping job {job_id} failed: {}", messages.join("; "))]
    JobFailed {
        job_id: String,
        messages: Vec<String>,
    },

    #[error("ID mapping job {job_id} did not finish after {polls} polls")]
    JobTimeout { job_id: String, polls: u32 },

    /// Malformed backend data
    #[error("Failed to parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Complexes must be expanded into their components, never translated as a whole
    #[error("Cannot translate '{id_type}' -> '{target_id_type}': complexes are expanded, not translated")]
    ComplexTranslation {
        id_type: String,
        target_id_type: String,
    },

    #[error("Unsupported ID type: {0}")]
    UnsupportedIdType(String),

    /// The backend has no data set for this organism
    #[error("{backend} has no data for organism {ncbi_tax_id}")]
    UnsupportedOrganism { backend: String, ncbi_tax_id: u32 },

    #[error(transparent)]
    Common(#[from] idmap_common::IdmapError),
}

impl MappingError {
    pub fn parse(source_name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn unsupported_organism(backend: impl Into<String>, ncbi_tax_id: u32) -> Self {
        Self::UnsupportedOrganism {
            backend: backend.into(),
            ncbi_tax_id,
        }
    }

    /// Whether the error means "the backend could not be reached or refused the job".
    ///
    /// Readers turn these into an empty table so the mapper can move on to its
    /// next fallback. Everything else is a data or usage problem and propagates.
    ///
    /// ID mapping job failures are deliberately included: the backend readers
    /// raise them, but `MapReader::load` logs them at `warn` and reports no
    /// table, so a failed job degrades to the next fallback instead of failing
    /// the translation.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            MappingError::Http(_)
                | MappingError::Network { .. }
                | MappingError::JobSubmission(_)
                | MappingError::JobFailed { .. }
                | MappingError::JobTimeout { .. }
        )
    }
}

impl From<quick_xml::Error> for MappingError {
    fn from(err: quick_xml::Error) -> Self {
        MappingError::Xml(err.to_string())
    }
}

impl From<csv::Error> for MappingError {
    fn from(err: csv::Error) -> Self {
        MappingError::parse("delimited file", err)
    }
}

impl From<zip::result::ZipError> for MappingError {
    fn from(err: zip::result::ZipError) -> Self {
        MappingError::parse("zip archive", err)
    }
}
