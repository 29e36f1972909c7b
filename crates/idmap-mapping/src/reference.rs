//! Reference accession lists per organism
//!
//! The cleanup pipeline filters translated accessions against the organism's
//! complete accession list. Lists are held in memory and in the disk cache.
//! A list that cannot be downloaded comes back empty; the failure is
//! remembered for `table_lifetime_secs` before the download is retried.

use crate::cache::CacheSlot;
use crate::input::{CacheParams, CACHE_SCHEMA_VERSION};
use crate::reader::ReadContext;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    SwissProt,
    Trembl,
    All,
}

impl ReferenceKind {
    fn name(self) -> &'static str {
        match self {
            ReferenceKind::SwissProt => "swissprot",
            ReferenceKind::Trembl => "trembl",
            ReferenceKind::All => "all",
        }
    }

    fn query(self, ncbi_tax_id: u32) -> String {
        match self {
            ReferenceKind::SwissProt => format!("organism_id:{} AND reviewed:true", ncbi_tax_id),
            ReferenceKind::Trembl => format!("organism_id:{} AND reviewed:false", ncbi_tax_id),
            ReferenceKind::All => format!("organism_id:{}", ncbi_tax_id),
        }
    }
}

#[derive(Default)]
pub struct ReferenceLists {
    lists: RwLock<HashMap<(u32, ReferenceKind), Arc<HashSet<String>>>>,
    failed: Mutex<HashMap<(u32, ReferenceKind), Instant>>,
}

impl ReferenceLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accession list, downloading it on first use; empty when unavailable
    pub fn get(&self, ctx: &ReadContext<'_>, ncbi_tax_id: u32, kind: ReferenceKind) -> Arc<HashSet<String>> {
        if let Some(list) = self.lists.read().get(&(ncbi_tax_id, kind)) {
            return Arc::clone(list);
        }
        if self.failed_recently(ctx, ncbi_tax_id, kind) {
            debug!(ncbi_tax_id, kind = kind.name(), "Skipping reference list that failed recently");
            return Arc::new(HashSet::new());
        }

        let params = cache_params(ncbi_tax_id, kind);
        if let Some(cache) = ctx.cache {
            if let Some(ids) = cache.read::<HashSet<String>>(&params, CacheSlot::List) {
                return self.set(ncbi_tax_id, kind, ids);
            }
        }

        match fetch(ctx, ncbi_tax_id, kind) {
            Ok(ids) if !ids.is_empty() => {
                info!(ncbi_tax_id, kind = kind.name(), count = ids.len(), "Loaded reference accession list");
                if let Some(cache) = ctx.cache {
                    if let Err(e) = cache.write(&params, CacheSlot::List, &ids) {
                        warn!(error = %e, "Failed to cache reference list");
                    }
                }
                self.set(ncbi_tax_id, kind, ids)
            },
            Ok(_) => {
                warn!(ncbi_tax_id, kind = kind.name(), "Reference accession list is empty");
                self.failed.lock().insert((ncbi_tax_id, kind), Instant::now());
                Arc::new(HashSet::new())
            },
            Err(e) => {
                warn!(ncbi_tax_id, kind = kind.name(), error = %e, "Reference accession list unavailable");
                self.failed.lock().insert((ncbi_tax_id, kind), Instant::now());
                Arc::new(HashSet::new())
            },
        }
    }

    fn failed_recently(&self, ctx: &ReadContext<'_>, ncbi_tax_id: u32, kind: ReferenceKind) -> bool {
        let mut failed = self.failed.lock();
        match failed.get(&(ncbi_tax_id, kind)) {
            Some(at) if at.elapsed() < ctx.config.table_lifetime() => true,
            Some(_) => {
                failed.remove(&(ncbi_tax_id, kind));
                false
            },
            None => false,
        }
    }

    pub fn set(&self, ncbi_tax_id: u32, kind: ReferenceKind, ids: HashSet<String>) -> Arc<HashSet<String>> {
        let ids = Arc::new(ids);
        self.lists.write().insert((ncbi_tax_id, kind), Arc::clone(&ids));
        self.failed.lock().remove(&(ncbi_tax_id, kind));
        ids
    }

    pub fn clear(&self) {
        self.lists.write().clear();
        self.failed.lock().clear();
    }
}

fn cache_params(ncbi_tax_id: u32, kind: ReferenceKind) -> CacheParams {
    let mut params = CacheParams::new();
    params.insert("schema".to_string(), CACHE_SCHEMA_VERSION.to_string());
    params.insert("backend".to_string(), "reference_list".to_string());
    params.insert("ncbi_tax_id".to_string(), ncbi_tax_id.to_string());
    params.insert("kind".to_string(), kind.name().to_string());
    params
}

fn fetch(ctx: &ReadContext<'_>, ncbi_tax_id: u32, kind: ReferenceKind) -> crate::Result<HashSet<String>> {
    let url = format!("{}/uniprotkb/stream", ctx.config.endpoints.uniprot_rest);
    let query = kind.query(ncbi_tax_id);
    let text = ctx
        .fetcher
        .get_text(&url, &[("query", query.as_str()), ("format", "list")])?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{Endpoints, MapperConfig};
    use crate::http::MockFetcher;

    #[test]
    fn test_download_and_memoize() {
        let config = MapperConfig::default().with_endpoints(Endpoints::all_at("http://mock"));
        let fetcher = MockFetcher::new().with_response("http://mock/uniprotkb/stream", "P04637\nP38398\n");
        let lists = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &lists);

        let first = lists.get(&ctx, 9606, ReferenceKind::All);
        assert_eq!(first.len(), 2);
        assert!(first.contains("P04637"));

        lists.get(&ctx, 9606, ReferenceKind::All);
        assert_eq!(fetcher.request_count("http://mock/uniprotkb/stream"), 1);

        let url = &fetcher.requests()[0].url;
        assert!(url.contains("format=list"));
        assert!(url.contains("organism_id%3A9606"));
    }

    #[test]
    fn test_unavailable_list_is_remembered() {
        let config = MapperConfig::default().with_endpoints(Endpoints::all_at("http://mock"));
        let fetcher = MockFetcher::new();
        let lists = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &lists);

        assert!(lists.get(&ctx, 9606, ReferenceKind::SwissProt).is_empty());
        assert!(lists.get(&ctx, 9606, ReferenceKind::SwissProt).is_empty());
        assert_eq!(fetcher.requests().len(), 1);

        lists.get(&ctx, 9606, ReferenceKind::Trembl);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[test]
    fn test_unavailable_list_retried_after_lifetime() {
        let config = MapperConfig::default()
            .with_endpoints(Endpoints::all_at("http://mock"))
            .with_table_lifetime_secs(0);
        let fetcher = MockFetcher::new();
        let lists = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &lists);

        lists.get(&ctx, 9606, ReferenceKind::All);
        lists.get(&ctx, 9606, ReferenceKind::All);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[test]
    fn test_set_replaces_failure() {
        let config = MapperConfig::default().with_endpoints(Endpoints::all_at("http://mock"));
        let fetcher = MockFetcher::new();
        let lists = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &lists);

        assert!(lists.get(&ctx, 9606, ReferenceKind::All).is_empty());
        lists.set(9606, ReferenceKind::All, HashSet::from(["P04637".to_string()]));
        assert!(lists.get(&ctx, 9606, ReferenceKind::All).contains("P04637"));
    }

    #[test]
    fn test_disk_cached_list() {
        let dir = tempfile::tempdir().unwrap();
        let cache = crate::cache::DiskCache::new(dir.path());
        let config = MapperConfig::default().with_endpoints(Endpoints::all_at("http://mock"));

        let fetcher = MockFetcher::new().with_response("http://mock/uniprotkb/stream", "Q9Y6K9\n");
        let lists = ReferenceLists::new();
        lists.get(&ReadContext::new(&fetcher, &config, Some(&cache), &lists), 9606, ReferenceKind::Trembl);

        let offline = MockFetcher::new();
        let fresh = ReferenceLists::new();
        let ids = fresh.get(&ReadContext::new(&offline, &config, Some(&cache), &fresh), 9606, ReferenceKind::Trembl);
        assert!(ids.contains("Q9Y6K9"));
        assert!(offline.requests().is_empty());
    }
}
