//! idmap Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared utilities and error handling for the idmap workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the base error type and result alias
//! - **Checksums**: content hashes used to address cache files and verify
//!   their payloads
//! - **Logging**: tracing subscriber setup shared by every binary
//!
//! # Example
//!
//! ```no_run
//! use idmap_common::checksum::{content_hash, ChecksumAlgorithm};
//!
//! let key = content_hash(
//!     [("id_type_a", "genesymbol"), ("id_type_b", "uniprot")],
//!     ChecksumAlgorithm::Md5,
//! );
//! assert_eq!(key.len(), 32);
//! ```

pub mod checksum;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{IdmapError, Result};
