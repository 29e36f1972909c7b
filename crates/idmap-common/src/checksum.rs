//! Checksum utilities for cache addressing and payload verification

use crate::error::{IdmapError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Checksum algorithm type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    /// Used to name cache files after their defining parameters
    Md5,
    /// Used to verify cached payloads
    Sha256,
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChecksumAlgorithm::Md5 => write!(f, "md5"),
            ChecksumAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Compute checksum of an in-memory buffer
pub fn compute_bytes_checksum(data: &[u8], algorithm: ChecksumAlgorithm) -> String {
    match algorithm {
        ChecksumAlgorithm::Md5 => format!("{:x}", md5::compute(data)),
        ChecksumAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
    }
}

/// Verify the checksum of an in-memory buffer
pub fn verify_bytes_checksum(
    data: &[u8],
    expected: &str,
    algorithm: ChecksumAlgorithm,
) -> Result<()> {
    let actual = compute_bytes_checksum(data, algorithm);
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(IdmapError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Hash a set of named parameters into a stable hex digest.
///
/// Parameters are sorted by name and serialized as `name=value` lines, so the
/// digest does not depend on the order in which the caller supplies them.
pub fn content_hash<I, K, V>(params: I, algorithm: ChecksumAlgorithm) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut lines: Vec<String> = params
        .into_iter()
        .map(|(k, v)| format!("{}={}", k.as_ref(), v.as_ref()))
        .collect();
    lines.sort();

    compute_bytes_checksum(lines.join("\n").as_bytes(), algorithm)
}
