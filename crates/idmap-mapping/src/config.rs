//! Mapper configuration
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional TOML
//! file, then `IDMAP_*` environment variables (a `.env` file is honoured).

use crate::error::{MappingError, Result};
use crate::organism::DEFAULT_NCBI_TAX_ID;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_CLEANUP_PERIOD_SECS: u64 = 10;
pub const DEFAULT_TABLE_LIFETIME_SECS: u64 = 300;
pub const DEFAULT_MEMO_CAPACITY: usize = 100_000;
pub const DEFAULT_REFSEQ_VERSION_PROBE_LIMIT: u32 = 49;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_IDMAPPING_CHUNK_SIZE: usize = 100_000;
pub const DEFAULT_IDMAPPING_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_IDMAPPING_POLL_INTERVAL_MS: u64 = 3_000;

pub const DEFAULT_UNIPROT_REST_URL: &str = "https://rest.uniprot.org";
pub const DEFAULT_UNIPROT_FTP_URL: &str =
    "https://ftp.uniprot.org/pub/databases/uniprot/current_release/knowledgebase";
pub const DEFAULT_BIOMART_URL: &str = "https://www.ensembl.org/biomart/martservice";
pub const DEFAULT_PRO_URL: &str = "https://proconsortium.org/download/current/promapping.txt";
pub const DEFAULT_UNICHEM_URL: &str =
    "https://ftp.ebi.ac.uk/pub/databases/chembl/UniChem/data/wholeSourceMapping";
pub const DEFAULT_RAMP_URL: &str = "https://rampdb.nih.gov/api/source_table.tsv.gz";
pub const DEFAULT_HMDB_URL: &str = "https://hmdb.ca/system/downloads/current/hmdb_metabolites.zip";
pub const DEFAULT_MIRBASE_URL: &str = "https://www.mirbase.org/download";

/// Settings for the UniProt ID mapping job protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniprotListConfig {
    /// IDs uploaded per job
    pub chunk_size: usize,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for UniprotListConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_IDMAPPING_CHUNK_SIZE,
            timeout_secs: DEFAULT_IDMAPPING_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_IDMAPPING_POLL_INTERVAL_MS,
        }
    }
}

impl UniprotListConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Number of status polls before giving up on a job
    pub fn max_polls(&self) -> u32 {
        if self.poll_interval_ms == 0 {
            return 1;
        }
        let timeout_ms = self.timeout_secs.saturating_mul(1000);
        let polls = timeout_ms.div_ceil(self.poll_interval_ms).max(1);
        u32::try_from(polls).unwrap_or(u32::MAX)
    }
}

/// Base URLs of every remote resource the readers talk to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub uniprot_rest: String,
    pub uniprot_ftp: String,
    pub biomart: String,
    pub pro: String,
    pub unichem: String,
    pub ramp: String,
    pub hmdb: String,
    pub mirbase: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            uniprot_rest: DEFAULT_UNIPROT_REST_URL.to_string(),
            uniprot_ftp: DEFAULT_UNIPROT_FTP_URL.to_string(),
            biomart: DEFAULT_BIOMART_URL.to_string(),
            pro: DEFAULT_PRO_URL.to_string(),
            unichem: DEFAULT_UNICHEM_URL.to_string(),
            ramp: DEFAULT_RAMP_URL.to_string(),
            hmdb: DEFAULT_HMDB_URL.to_string(),
            mirbase: DEFAULT_MIRBASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at one base URL, e.g. a local mock server
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            uniprot_rest: base.to_string(),
            uniprot_ftp: format!("{base}/knowledgebase"),
            biomart: format!("{base}/biomart/martservice"),
            pro: format!("{base}/pro/promapping.txt"),
            unichem: format!("{base}/unichem"),
            ramp: format!("{base}/ramp/source.tsv"),
            hmdb: format!("{base}/hmdb/hmdb_metabolites.xml"),
            mirbase: format!("{base}/mirbase"),
        }
    }

    fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("uniprot_rest", &self.uniprot_rest),
            ("uniprot_ftp", &self.uniprot_ftp),
            ("biomart", &self.biomart),
            ("pro", &self.pro),
            ("unichem", &self.unichem),
            ("ramp", &self.ramp),
            ("hmdb", &self.hmdb),
            ("mirbase", &self.mirbase),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub default_ncbi_tax_id: u32,
    pub cache_dir: PathBuf,
    /// Read and write the on-disk table cache
    pub use_cache: bool,
    /// Seconds between background expiry sweeps
    pub cleanup_period_secs: u64,
    /// Seconds of inactivity before a loaded table is evicted
    pub table_lifetime_secs: u64,
    /// Entries kept in the `map_name` memo
    pub memo_capacity: usize,
    pub translate_deleted_uniprot: bool,
    pub keep_invalid_uniprot: bool,
    pub trembl_swissprot_by_genesymbol: bool,
    /// Highest RefSeq version tried when an unversioned lookup misses
    pub refseq_version_probe_limit: u32,
    pub http_timeout_secs: u64,
    pub uniprot_list: UniprotListConfig,
    pub endpoints: Endpoints,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            default_ncbi_tax_id: DEFAULT_NCBI_TAX_ID,
            cache_dir: default_cache_dir(),
            use_cache: true,
            cleanup_period_secs: DEFAULT_CLEANUP_PERIOD_SECS,
            table_lifetime_secs: DEFAULT_TABLE_LIFETIME_SECS,
            memo_capacity: DEFAULT_MEMO_CAPACITY,
            translate_deleted_uniprot: false,
            keep_invalid_uniprot: false,
            trembl_swissprot_by_genesymbol: true,
            refseq_version_probe_limit: DEFAULT_REFSEQ_VERSION_PROBE_LIMIT,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            uniprot_list: UniprotListConfig::default(),
            endpoints: Endpoints::default(),
        }
    }
}

/// Platform cache directory plus `idmap`, or `.idmap-cache` when there is none
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("idmap"))
        .unwrap_or_else(|| PathBuf::from(".idmap-cache"))
}

impl MapperConfig {
    /// Defaults overridden by the environment
    pub fn from_env() -> Result<Self> {
        Self::default().merge_env()
    }

    /// A TOML file overridden by the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: MapperConfig = toml::from_str(&text)
            .map_err(|e| MappingError::config(format!("{}: {}", path.display(), e)))?;
        config.merge_env()
    }

    /// Apply `IDMAP_*` environment variables on top of this configuration
    pub fn merge_env(mut self) -> Result<Self> {
        dotenvy::dotenv().ok();

        if let Some(v) = env_parse("IDMAP_NCBI_TAX_ID")? {
            self.default_ncbi_tax_id = v;
        }
        if let Ok(dir) = std::env::var("IDMAP_CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(v) = env_parse("IDMAP_USE_CACHE")? {
            self.use_cache = v;
        }
        if let Some(v) = env_parse("IDMAP_CLEANUP_PERIOD_SECS")? {
            self.cleanup_period_secs = v;
        }
        if let Some(v) = env_parse("IDMAP_TABLE_LIFETIME_SECS")? {
            self.table_lifetime_secs = v;
        }
        if let Some(v) = env_parse("IDMAP_MEMO_CAPACITY")? {
            self.memo_capacity = v;
        }
        if let Some(v) = env_parse("IDMAP_TRANSLATE_DELETED_UNIPROT")? {
            self.translate_deleted_uniprot = v;
        }
        if let Some(v) = env_parse("IDMAP_KEEP_INVALID_UNIPROT")? {
            self.keep_invalid_uniprot = v;
        }
        if let Some(v) = env_parse("IDMAP_TREMBL_SWISSPROT_BY_GENESYMBOL")? {
            self.trembl_swissprot_by_genesymbol = v;
        }
        if let Some(v) = env_parse("IDMAP_REFSEQ_VERSION_PROBE_LIMIT")? {
            self.refseq_version_probe_limit = v;
        }
        if let Some(v) = env_parse("IDMAP_HTTP_TIMEOUT_SECS")? {
            self.http_timeout_secs = v;
        }
        if let Some(v) = env_parse("IDMAP_IDMAPPING_CHUNK_SIZE")? {
            self.uniprot_list.chunk_size = v;
        }
        if let Some(v) = env_parse("IDMAP_IDMAPPING_TIMEOUT_SECS")? {
            self.uniprot_list.timeout_secs = v;
        }
        if let Some(v) = env_parse("IDMAP_IDMAPPING_POLL_INTERVAL_MS")? {
            self.uniprot_list.poll_interval_ms = v;
        }
        if let Ok(url) = std::env::var("IDMAP_UNIPROT_REST_URL") {
            self.endpoints.uniprot_rest = url;
        }
        if let Ok(url) = std::env::var("IDMAP_UNIPROT_FTP_URL") {
            self.endpoints.uniprot_ftp = url;
        }
        if let Ok(url) = std::env::var("IDMAP_BIOMART_URL") {
            self.endpoints.biomart = url;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cleanup_period_secs == 0 {
            return Err(MappingError::config("cleanup_period_secs must be greater than 0"));
        }
        if self.memo_capacity == 0 {
            return Err(MappingError::config("memo_capacity must be greater than 0"));
        }
        if self.uniprot_list.chunk_size == 0 {
            return Err(MappingError::config("uniprot_list.chunk_size must be greater than 0"));
        }
        if self.uniprot_list.poll_interval_ms == 0 && self.uniprot_list.timeout_secs == 0 {
            return Err(MappingError::config(
                "uniprot_list.poll_interval_ms and uniprot_list.timeout_secs cannot both be 0",
            ));
        }
        for (name, url) in self.endpoints.entries() {
            if url.trim().is_empty() {
                return Err(MappingError::config(format!("endpoint '{}' is empty", name)));
            }
        }
        Ok(())
    }

    pub fn cleanup_period(&self) -> Duration {
        Duration::from_secs(self.cleanup_period_secs)
    }

    pub fn table_lifetime(&self) -> Duration {
        Duration::from_secs(self.table_lifetime_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn with_ncbi_tax_id(mut self, ncbi_tax_id: u32) -> Self {
        self.default_ncbi_tax_id = ncbi_tax_id;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn with_cleanup_period_secs(mut self, secs: u64) -> Self {
        self.cleanup_period_secs = secs;
        self
    }

    pub fn with_table_lifetime_secs(mut self, secs: u64) -> Self {
        self.table_lifetime_secs = secs;
        self
    }

    pub fn with_memo_capacity(mut self, capacity: usize) -> Self {
        self.memo_capacity = capacity;
        self
    }

    pub fn with_translate_deleted_uniprot(mut self, enabled: bool) -> Self {
        self.translate_deleted_uniprot = enabled;
        self
    }

    pub fn with_keep_invalid_uniprot(mut self, enabled: bool) -> Self {
        self.keep_invalid_uniprot = enabled;
        self
    }

    pub fn with_trembl_swissprot_by_genesymbol(mut self, enabled: bool) -> Self {
        self.trembl_swissprot_by_genesymbol = enabled;
        self
    }

    pub fn with_uniprot_list(mut self, uniprot_list: UniprotListConfig) -> Self {
        self.uniprot_list = uniprot_list;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| MappingError::config(format!("{}={}: {}", name, raw, e))),
        Err(_) => Ok(None),
    }
}
