//! On-disk cache of loaded tables and reference lists
//!
//! Files live under `<cache_dir>/mapping/` and are named after the md5 of the
//! defining [`CacheParams`]: `{md5}-a_b.json.gz`, `{md5}-b_a.json.gz` or
//! `{md5}-list.json.gz`. Each file is a gzipped JSON envelope carrying the
//! schema version, creation time and a sha256 of the payload. Anything that
//! does not check out is treated as a miss.

use crate::error::{MappingError, Result};
use crate::input::{CacheParams, CACHE_SCHEMA_VERSION};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use idmap_common::checksum::{compute_bytes_checksum, content_hash, verify_bytes_checksum, ChecksumAlgorithm};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const CACHE_SUBDIR: &str = "mapping";
const CACHE_SUFFIX: &str = ".json.gz";

/// Which dictionary of a two-sided input a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSlot {
    AToB,
    BToA,
    List,
}

impl CacheSlot {
    fn suffix(self) -> &'static str {
        match self {
            CacheSlot::AToB => "a_b",
            CacheSlot::BToA => "b_a",
            CacheSlot::List => "list",
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    schema: u32,
    created_at: DateTime<Utc>,
    params: CacheParams,
    checksum: String,
    /// JSON text of the cached value
    payload: String,
}

/// One file in the cache directory
#[derive(Debug, Clone, Serialize)]
pub struct CacheEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: cache_dir.as_ref().join(CACHE_SUBDIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, params: &CacheParams, slot: CacheSlot) -> PathBuf {
        let digest = content_hash(params, ChecksumAlgorithm::Md5);
        self.dir
            .join(format!("{}-{}{}", digest, slot.suffix(), CACHE_SUFFIX))
    }

    /// Cached value, or `None` on any kind of miss
    pub fn read<T: DeserializeOwned>(&self, params: &CacheParams, slot: CacheSlot) -> Option<T> {
        let path = self.path_for(params, slot);
        if !path.exists() {
            debug!(path = %path.display(), "Cache miss");
            return None;
        }

        match Self::read_envelope(&path) {
            Ok(value) => {
                debug!(path = %path.display(), "Cache hit");
                Some(value)
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unusable cache file");
                None
            },
        }
    }

    fn read_envelope<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let file = std::fs::File::open(path)?;
        let mut json = String::new();
        GzDecoder::new(file).read_to_string(&mut json)?;

        let envelope: Envelope = serde_json::from_str(&json)?;
        if envelope.schema != CACHE_SCHEMA_VERSION {
            return Err(MappingError::cache(format!(
                "schema {} (expected {})",
                envelope.schema, CACHE_SCHEMA_VERSION
            )));
        }

        verify_bytes_checksum(envelope.payload.as_bytes(), &envelope.checksum, ChecksumAlgorithm::Sha256)?;

        Ok(serde_json::from_str(&envelope.payload)?)
    }

    /// Write `value` atomically: a temp file in the cache directory renamed into place
    pub fn write<T: Serialize>(&self, params: &CacheParams, slot: CacheSlot, value: &T) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(params, slot);

        let payload = serde_json::to_string(value)?;
        let envelope = Envelope {
            schema: CACHE_SCHEMA_VERSION,
            created_at: Utc::now(),
            params: params.clone(),
            checksum: compute_bytes_checksum(payload.as_bytes(), ChecksumAlgorithm::Sha256),
            payload,
        };

        let tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        let mut encoder = GzEncoder::new(tmp, Compression::default());
        serde_json::to_writer(&mut encoder, &envelope)?;
        let mut tmp = encoder.finish()?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| MappingError::Io(e.error))?;

        debug!(path = %path.display(), "Cache written");
        Ok(path)
    }

    pub fn list(&self) -> Result<Vec<CacheEntry>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !file_name.ends_with(CACHE_SUFFIX) {
                continue;
            }
            let metadata = entry.metadata()?;
            entries.push(CacheEntry {
                path: entry.path(),
                file_name,
                size_bytes: metadata.len(),
                modified: metadata.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now()),
            });
        }
        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }

    /// Remove every cache file; returns how many were removed
    pub fn clear(&self) -> Result<usize> {
        self.remove_where(|_| true)
    }

    pub fn remove_older_than(&self, age: Duration) -> Result<usize> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(age).map_err(|e| MappingError::cache(e.to_string()))?;
        self.remove_where(|entry| entry.modified < cutoff)
    }

    fn remove_where(&self, predicate: impl Fn(&CacheEntry) -> bool) -> Result<usize> {
        let mut removed = 0;
        for entry in self.list()? {
            if predicate(&entry) {
                std::fs::remove_file(&entry.path)?;
                removed += 1;
            }
        }
        debug!(dir = %self.dir.display(), removed, "Cache files removed");
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::table::MappingData;
    use std::collections::HashSet;

    fn params(b: &str) -> CacheParams {
        let mut params = CacheParams::new();
        params.insert("schema".to_string(), CACHE_SCHEMA_VERSION.to_string());
        params.insert("backend".to_string(), "file".to_string());
        params.insert("id_type_a".to_string(), "genesymbol".to_string());
        params.insert("id_type_b".to_string(), b.to_string());
        params
    }

    fn data() -> MappingData {
        let mut data = MappingData::new();
        data.insert("TP53".to_string(), HashSet::from(["P04637".to_string()]));
        data
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());

        let path = cache.write(&params("uniprot"), CacheSlot::AToB, &data()).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.ends_with("-a_b.json.gz"));
        assert_eq!(name.len(), 32 + "-a_b.json.gz".len());

        let read: MappingData = cache.read(&params("uniprot"), CacheSlot::AToB).unwrap();
        assert_eq!(read, data());

        assert!(cache.read::<MappingData>(&params("uniprot"), CacheSlot::BToA).is_none());
        assert!(cache.read::<MappingData>(&params("entrez"), CacheSlot::AToB).is_none());
    }

    #[test]
    fn test_corrupted_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        let path = cache.write(&params("uniprot"), CacheSlot::AToB, &data()).unwrap();

        std::fs::write(&path, b"not gzip at all").unwrap();
        assert!(cache.read::<MappingData>(&params("uniprot"), CacheSlot::AToB).is_none());
    }

    #[test]
    fn test_tampered_payload_fails_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        let path = cache.write(&params("uniprot"), CacheSlot::AToB, &data()).unwrap();

        let mut json = String::new();
        GzDecoder::new(std::fs::File::open(&path).unwrap())
            .read_to_string(&mut json)
            .unwrap();
        let tampered = json.replace("P04637", "P99999");
        let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
        encoder.write_all(tampered.as_bytes()).unwrap();
        encoder.finish().unwrap();

        assert!(cache.read::<MappingData>(&params("uniprot"), CacheSlot::AToB).is_none());
    }

    #[test]
    fn test_list_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        assert!(cache.list().unwrap().is_empty());

        cache.write(&params("uniprot"), CacheSlot::AToB, &data()).unwrap();
        cache.write(&params("uniprot"), CacheSlot::BToA, &data()).unwrap();
        let list: HashSet<String> = HashSet::from(["P04637".to_string()]);
        cache.write(&params("uniprot"), CacheSlot::List, &list).unwrap();

        assert_eq!(cache.list().unwrap().len(), 3);
        assert_eq!(cache.remove_older_than(Duration::from_secs(3600)).unwrap(), 0);
        assert_eq!(cache.clear().unwrap(), 3);
        assert!(cache.list().unwrap().is_empty());
    }
}
