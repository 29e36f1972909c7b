//! The translation façade
//!
//! [`Mapper`] owns the loaded tables and resolves
//! `(name, id_type, target_id_type, organism)` to a set of identifiers. Tables
//! are found or loaded by [`Mapper::which_table`]; when the direct lookup
//! misses, an ordered list of fallback strategies is tried (see
//! [`strategy`]). UniProt targets go through the cleanup pipeline.
//!
//! A `Mapper` is an explicit handle: construct one with [`Mapper::builder`]
//! and share it by reference or `Arc`. All methods take `&self`.

mod cleanup;
mod special;
pub mod strategy;

use crate::cache::DiskCache;
use crate::config::MapperConfig;
use crate::error::{MappingError, Result};
use crate::http::{Fetcher, HttpFetcher};
use crate::id_types::{COMPLEX, GENESYMBOL, GENESYMBOL5, UNIPROT};
use crate::key::MappingTableKey;
use crate::reader::{MapReader, ReadContext};
use crate::reference::{ReferenceKind, ReferenceLists};
use crate::registry::TableRegistry;
use crate::resources::{self, Resource};
use crate::sweeper::Sweeper;
use crate::table::{MappingData, MappingTable};
use lru::LruCache;
use parking_lot::{Mutex, ReentrantMutex};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Prefix of complex names: `COMPLEX:P04637_P38398`
pub const COMPLEX_PREFIX: &str = "COMPLEX:";

/// Per-call translation switches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapOptions {
    /// Organism; the configured default when `None`
    pub ncbi_tax_id: Option<u32>,
    /// Skip the lossy fallbacks (appending `1`, trying RefSeq versions, 5-character prefixes).
    ///
    /// Case variants, synonyms and dropping the version of an Ensembl or RefSeq
    /// ID still apply: they name the same record.
    pub strict: bool,
    /// Translate complexes component-wise instead of returning them unchanged
    pub expand_complexes: bool,
    /// Run the UniProt cleanup pipeline on UniProt results
    pub uniprot_cleanup: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            ncbi_tax_id: None,
            strict: false,
            expand_complexes: true,
            uniprot_cleanup: true,
        }
    }
}

impl MapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn organism(mut self, ncbi_tax_id: u32) -> Self {
        self.ncbi_tax_id = Some(ncbi_tax_id);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn expand_complexes(mut self, expand: bool) -> Self {
        self.expand_complexes = expand;
        self
    }

    pub fn uniprot_cleanup(mut self, cleanup: bool) -> Self {
        self.uniprot_cleanup = cleanup;
        self
    }

    /// Same options pinned to `ncbi_tax_id`, without cleanup (for intermediate hops)
    pub(crate) fn hop(&self, ncbi_tax_id: u32) -> Self {
        Self {
            ncbi_tax_id: Some(ncbi_tax_id),
            uniprot_cleanup: false,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    name: String,
    id_type: String,
    target_id_type: String,
    ncbi_tax_id: u32,
    strict: bool,
    expand_complexes: bool,
    uniprot_cleanup: bool,
}

/// Memo counters since construction (or the last [`Mapper::clear`])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

pub struct MapperBuilder {
    config: MapperConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
    background_cleanup: bool,
}

impl MapperBuilder {
    pub fn config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `fetcher` instead of an [`HttpFetcher`]
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Run the periodic expiry sweep on a background thread (default: on)
    pub fn background_cleanup(mut self, enabled: bool) -> Self {
        self.background_cleanup = enabled;
        self
    }

    pub fn build(self) -> Result<Mapper> {
        let config = self.config;
        config.validate()?;

        let fetcher: Arc<dyn Fetcher> = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpFetcher::new(config.http_timeout())?),
        };
        let cache = config.use_cache.then(|| DiskCache::new(&config.cache_dir));
        let capacity = NonZeroUsize::new(config.memo_capacity)
            .ok_or_else(|| MappingError::config("memo_capacity must be greater than 0"))?;

        let registry = Arc::new(TableRegistry::new());
        let sweeper = if self.background_cleanup {
            Some(Sweeper::start(&registry, config.cleanup_period(), config.table_lifetime())?)
        } else {
            None
        };

        info!(
            ncbi_tax_id = config.default_ncbi_tax_id,
            cache_dir = %config.cache_dir.display(),
            use_cache = config.use_cache,
            background_cleanup = sweeper.is_some(),
            "Mapper ready"
        );

        Ok(Mapper {
            config,
            fetcher,
            registry,
            references: ReferenceLists::new(),
            cache,
            memo: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            load_lock: ReentrantMutex::new(()),
            sweeper: Mutex::new(sweeper),
        })
    }
}

pub struct Mapper {
    config: MapperConfig,
    fetcher: Arc<dyn Fetcher>,
    registry: Arc<TableRegistry>,
    references: ReferenceLists,
    cache: Option<DiskCache>,
    memo: Mutex<LruCache<MemoKey, HashSet<String>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    /// Serializes table loads; re-entrant because derived tables load their sources
    load_lock: ReentrantMutex<()>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl Mapper {
    pub fn builder() -> MapperBuilder {
        MapperBuilder {
            config: MapperConfig::default(),
            fetcher: None,
            background_cleanup: true,
        }
    }

    /// A mapper with `config`, the HTTP fetcher and background cleanup
    pub fn new(config: MapperConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub(crate) fn read_context(&self) -> ReadContext<'_> {
        ReadContext::new(self.fetcher.as_ref(), &self.config, self.cache.as_ref(), &self.references)
    }

    fn resolve_tax_id(&self, options: &MapOptions) -> u32 {
        options.ncbi_tax_id.unwrap_or(self.config.default_ncbi_tax_id)
    }

    // ========================================================================
    // Translation
    // ========================================================================

    /// Translate with default options
    pub fn map_name(&self, name: &str, id_type: &str, target_id_type: &str) -> Result<HashSet<String>> {
        self.map_name_with(name, id_type, target_id_type, &MapOptions::default())
    }

    /// Translate one name. A miss is an empty set.
    ///
    /// Fails only for caller misuse (translating the `complex` pseudo type)
    /// and for garbled backend data.
    pub fn map_name_with(
        &self,
        name: &str,
        id_type: &str,
        target_id_type: &str,
        options: &MapOptions,
    ) -> Result<HashSet<String>> {
        if id_type == COMPLEX || target_id_type == COMPLEX {
            return Err(MappingError::ComplexTranslation {
                id_type: id_type.to_string(),
                target_id_type: target_id_type.to_string(),
            });
        }

        let ncbi_tax_id = self.resolve_tax_id(options);
        let memo_key = MemoKey {
            name: name.to_string(),
            id_type: id_type.to_string(),
            target_id_type: target_id_type.to_string(),
            ncbi_tax_id,
            strict: options.strict,
            expand_complexes: options.expand_complexes,
            uniprot_cleanup: options.uniprot_cleanup,
        };

        if let Some(hit) = self.memo.lock().get(&memo_key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let result = self.translate(name, id_type, target_id_type, ncbi_tax_id, options)?;
        self.memo.lock().put(memo_key, result.clone());
        Ok(result)
    }

    fn translate(
        &self,
        name: &str,
        id_type: &str,
        target_id_type: &str,
        ncbi_tax_id: u32,
        options: &MapOptions,
    ) -> Result<HashSet<String>> {
        if let Some(components) = complex_components(name) {
            if !options.expand_complexes {
                return Ok(HashSet::from([name.to_string()]));
            }
            let mut result = HashSet::new();
            for component in components {
                result.extend(self.map_name_with(component, id_type, target_id_type, options)?);
            }
            return Ok(result);
        }

        let cleanup = target_id_type == UNIPROT && options.uniprot_cleanup;

        if id_type == target_id_type {
            let identity = HashSet::from([name.to_string()]);
            return if cleanup {
                self.uniprot_cleanup(identity, ncbi_tax_id)
            } else {
                Ok(identity)
            };
        }

        let query = strategy::Query {
            name,
            id_type,
            target_id_type,
            ncbi_tax_id,
            options,
        };
        let result = strategy::run(self, &query)?;

        if cleanup && !result.is_empty() {
            self.uniprot_cleanup(result, ncbi_tax_id)
        } else {
            Ok(result)
        }
    }

    /// One arbitrary (the smallest) translation, or `None`
    pub fn map_name0(
        &self,
        name: &str,
        id_type: &str,
        target_id_type: &str,
        options: &MapOptions,
    ) -> Result<Option<String>> {
        Ok(self
            .map_name_with(name, id_type, target_id_type, options)?
            .into_iter()
            .min())
    }

    /// Union of [`Mapper::map_name_with`] over `names`
    pub fn map_names<I, S>(
        &self,
        names: I,
        id_type: &str,
        target_id_type: &str,
        options: &MapOptions,
    ) -> Result<HashSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = HashSet::new();
        for name in names {
            result.extend(self.map_name_with(name.as_ref(), id_type, target_id_type, options)?);
        }
        Ok(result)
    }

    /// The whole table, loading it if needed
    pub fn translation_dict(
        &self,
        id_type: &str,
        target_id_type: &str,
        ncbi_tax_id: Option<u32>,
    ) -> Result<Option<Arc<MappingTable>>> {
        let ncbi_tax_id = ncbi_tax_id.unwrap_or(self.config.default_ncbi_tax_id);
        self.which_table(id_type, target_id_type, ncbi_tax_id, true)
    }

    /// Direct lookup in the `id_type -> target_id_type` table, loading it if needed
    pub(crate) fn lookup(
        &self,
        name: &str,
        id_type: &str,
        target_id_type: &str,
        ncbi_tax_id: u32,
    ) -> Result<HashSet<String>> {
        Ok(self
            .which_table(id_type, target_id_type, ncbi_tax_id, true)?
            .map(|table| table.get(name))
            .unwrap_or_default())
    }

    // ========================================================================
    // Table resolution
    // ========================================================================

    /// Find the table for `id_type -> target_id_type`.
    ///
    /// Order: exact key, organism agnostic key, reverse of a loaded table
    /// (derived and registered), then, when `load` is set, predefined
    /// resources, implicit backend families, the gene symbol prefix index and
    /// the UniProt static file. `None` when nothing serves the pair.
    pub fn which_table(
        &self,
        id_type: &str,
        target_id_type: &str,
        ncbi_tax_id: u32,
        load: bool,
    ) -> Result<Option<Arc<MappingTable>>> {
        let key = MappingTableKey::new(id_type, target_id_type, ncbi_tax_id);
        if let Some(table) = self.find_loaded(&key) {
            return Ok(Some(table));
        }
        if !load {
            return Ok(None);
        }

        let _guard = self.load_lock.lock();
        if let Some(table) = self.find_loaded(&key) {
            return Ok(Some(table));
        }
        if self.registry.is_failed(&key) {
            debug!(key = %key, "Skipping key that failed to load recently");
            return Ok(None);
        }

        match self.load_table(&key)? {
            Some(table) => Ok(Some(table)),
            None => {
                info!(key = %key, "No resource provides this table");
                self.registry.mark_failed(key);
                Ok(None)
            },
        }
    }

    fn find_loaded(&self, key: &MappingTableKey) -> Option<Arc<MappingTable>> {
        if let Some(table) = self.registry.get(key) {
            return Some(table);
        }
        if let Some(table) = self.registry.get(&key.organism_agnostic()) {
            return Some(table);
        }

        let reversed = key.reversed();
        let source = self
            .registry
            .get(&reversed)
            .or_else(|| self.registry.get(&reversed.organism_agnostic()))?;
        let derived = self.registry.insert(source.reverse());
        debug!(key = %derived.key(), entries = derived.len(), "Derived reverse table");
        Some(derived)
    }

    fn load_table(&self, key: &MappingTableKey) -> Result<Option<Arc<MappingTable>>> {
        let (id_type, target_id_type, tax) = (key.id_type.as_str(), key.target_id_type.as_str(), key.ncbi_tax_id);

        if let Some(resource) = resources::predefined(id_type, target_id_type) {
            if let Some(table) = self.load_resource(&resource, id_type, target_id_type, tax)? {
                return Ok(Some(table));
            }
        }

        for resource in resources::implicit(id_type, target_id_type, tax) {
            if let Some(table) = self.load_resource(&resource, id_type, target_id_type, tax)? {
                return Ok(Some(table));
            }
        }

        if id_type == GENESYMBOL5 && target_id_type == UNIPROT {
            if let Some(table) = self.load_genesymbol5(tax)? {
                return Ok(Some(table));
            }
        }

        if resources::uniprot_static_eligible(id_type, target_id_type) {
            return self.load_uniprot_static(id_type, target_id_type, tax);
        }

        Ok(None)
    }

    fn load_resource(
        &self,
        resource: &Resource,
        id_type: &str,
        target_id_type: &str,
        ncbi_tax_id: u32,
    ) -> Result<Option<Arc<MappingTable>>> {
        let Some((a_to_b, b_to_a)) = resource.directions_for(id_type, target_id_type) else {
            return Ok(None);
        };

        let ctx = self.read_context();
        let loaded = MapReader::new(&resource.input, ncbi_tax_id, &ctx)
            .with_id_types(&resource.id_type_a, &resource.id_type_b)
            .directions(a_to_b, b_to_a)
            .load()?;

        let table = if a_to_b { loaded.a_to_b } else { loaded.b_to_a };
        Ok(table.map(|table| {
            debug!(key = %table.key(), backend = resource.backend(), entries = table.len(), "Registered table");
            self.registry.insert(table)
        }))
    }

    /// Build the lossy `genesymbol5 -> uniprot` index from the gene symbol table.
    ///
    /// Every symbol of at least five characters contributes its first five
    /// characters as a key.
    pub fn load_genesymbol5(&self, ncbi_tax_id: u32) -> Result<Option<Arc<MappingTable>>> {
        let _guard = self.load_lock.lock();
        let key = MappingTableKey::new(GENESYMBOL5, UNIPROT, ncbi_tax_id);
        if let Some(table) = self.registry.get(&key) {
            return Ok(Some(table));
        }

        let Some(source) = self.which_table(GENESYMBOL, UNIPROT, ncbi_tax_id, true)? else {
            return Ok(None);
        };

        let mut data = MappingData::new();
        for (symbol, uniprots) in source.data() {
            if symbol.chars().count() < 5 {
                continue;
            }
            let prefix: String = symbol.chars().take(5).collect();
            data.entry(prefix).or_default().extend(uniprots.iter().cloned());
        }

        let table = MappingTable::new(data, GENESYMBOL5, UNIPROT, ncbi_tax_id, self.config.table_lifetime());
        info!(ncbi_tax_id, entries = table.len(), "Built gene symbol prefix index");
        Ok(Some(self.registry.insert(table)))
    }

    /// Load `id_type -> target_id_type` from the organism's UniProt `idmapping_selected.tab.gz`
    pub fn load_uniprot_static(
        &self,
        id_type: &str,
        target_id_type: &str,
        ncbi_tax_id: u32,
    ) -> Result<Option<Arc<MappingTable>>> {
        let _guard = self.load_lock.lock();
        let Some(resource) = resources::uniprot_static(id_type, target_id_type, ncbi_tax_id, &self.config) else {
            return Ok(None);
        };
        self.load_resource(&resource, id_type, target_id_type, ncbi_tax_id)
    }

    // ========================================================================
    // Table management
    // ========================================================================

    /// Register a table built by the caller; replaces any table under the same key
    pub fn add_table(&self, table: MappingTable) -> Arc<MappingTable> {
        let table = self.registry.insert(table);
        self.memo.lock().clear();
        table
    }

    pub fn remove_table(&self, key: &MappingTableKey) -> Option<Arc<MappingTable>> {
        let removed = self.registry.remove(key);
        if removed.is_some() {
            self.memo.lock().clear();
        }
        removed
    }

    /// Drop every table, failed-load marker, reference list and memo entry
    pub fn clear(&self) {
        self.registry.clear();
        self.references.clear();
        self.memo.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn loaded_keys(&self) -> Vec<MappingTableKey> {
        self.registry.keys()
    }

    /// Evict expired tables now, as the background sweep does
    pub fn remove_expired(&self) -> Vec<MappingTableKey> {
        let removed = self.registry.remove_expired(Instant::now(), self.config.table_lifetime());
        if !removed.is_empty() {
            info!(evicted = removed.len(), "Evicted expired tables");
        }
        removed
    }

    /// Supply a reference accession list instead of downloading it
    pub fn set_reference_list(&self, ncbi_tax_id: u32, kind: ReferenceKind, accessions: HashSet<String>) {
        self.references.set(ncbi_tax_id, kind, accessions);
        self.memo.lock().clear();
    }

    pub fn memo_stats(&self) -> MemoStats {
        let memo = self.memo.lock();
        MemoStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: memo.len(),
            capacity: memo.cap().get(),
        }
    }

    /// Stop the background sweep; the mapper stays usable
    pub fn shutdown(&self) {
        if let Some(mut sweeper) = self.sweeper.lock().take() {
            sweeper.stop();
            debug!("Background cleanup stopped");
        }
    }

    /// Table sizes by key, for reporting
    pub fn table_sizes(&self) -> HashMap<MappingTableKey, usize> {
        self.registry
            .keys()
            .into_iter()
            .filter_map(|key| {
                let len = self.registry.get(&key)?.len();
                Some((key, len))
            })
            .collect()
    }
}

/// Components of `COMPLEX:a_b_c`, or `None` for a plain name
pub fn complex_components(name: &str) -> Option<Vec<&str>> {
    let body = name.strip_prefix(COMPLEX_PREFIX)?;
    Some(body.split('_').filter(|c| !c.is_empty()).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod tests {
    use super::*;
    use crate::http::MockFetcher;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    pub(crate) fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    pub(crate) fn table(pairs: &[(&str, &str)], id_type: &str, target: &str, tax: u32) -> MappingTable {
        let mut data = MappingData::new();
        for (a, b) in pairs {
            data.entry(a.to_string()).or_default().insert(b.to_string());
        }
        MappingTable::new(data, id_type, target, tax, Duration::from_secs(300))
    }

    /// Offline mapper: unknown URLs answer 404, so only added tables are used
    pub(crate) fn offline_mapper() -> Mapper {
        Mapper::builder()
            .config(MapperConfig::default().with_use_cache(false))
            .fetcher(Arc::new(MockFetcher::new()))
            .background_cleanup(false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_complex_components() {
        assert_eq!(complex_components("COMPLEX:P04637_P38398"), Some(vec!["P04637", "P38398"]));
        assert_eq!(complex_components("P04637"), None);
    }

    #[test]
    fn test_which_table_prefers_exact_then_agnostic() {
        let mapper = offline_mapper();
        mapper.add_table(table(&[("15377", "HMDB0002111")], "chebi", "hmdb", 0));

        let found = mapper.which_table("chebi", "hmdb", 9606, false).unwrap().unwrap();
        assert_eq!(found.ncbi_tax_id(), 0);
    }

    #[test]
    fn test_which_table_derives_reverse() {
        let mapper = offline_mapper();
        mapper.add_table(table(&[("TP53", "P04637")], "genesymbol", "uniprot", 9606));

        let reverse = mapper.which_table("uniprot", "genesymbol", 9606, false).unwrap().unwrap();
        assert_eq!(reverse.get("P04637"), set(&["TP53"]));
        assert_eq!(mapper.loaded_keys().len(), 2);
    }

    #[test]
    fn test_which_table_without_load_is_none() {
        let mapper = offline_mapper();
        assert!(mapper.which_table("entrez", "uniprot", 9606, false).unwrap().is_none());
        assert!(mapper.loaded_keys().is_empty());
    }

    #[test]
    fn test_failed_load_is_remembered() {
        let fetcher = Arc::new(MockFetcher::new());
        let mapper = Mapper::builder()
            .config(MapperConfig::default().with_use_cache(false))
            .fetcher(fetcher.clone())
            .background_cleanup(false)
            .build()
            .unwrap();

        assert!(mapper.which_table("uniprot", "entrez", 9606, true).unwrap().is_none());
        let requests = fetcher.requests().len();
        assert!(requests > 0);

        assert!(mapper.which_table("uniprot", "entrez", 9606, true).unwrap().is_none());
        assert_eq!(fetcher.requests().len(), requests);
    }

    #[test]
    fn test_complex_type_is_rejected() {
        let mapper = offline_mapper();
        let err = mapper.map_name("COMPLEX:P04637_P38398", "complex", "uniprot").unwrap_err();
        assert!(matches!(err, MappingError::ComplexTranslation { .. }));
    }

    #[test]
    fn test_memo_counts_hits() {
        let mapper = offline_mapper();
        mapper.add_table(table(&[("TP53", "7157")], "genesymbol", "entrez", 9606));

        mapper.map_name("TP53", "genesymbol", "entrez").unwrap();
        mapper.map_name("TP53", "genesymbol", "entrez").unwrap();

        let stats = mapper.memo_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_add_table_invalidates_memo() {
        let mapper = offline_mapper();
        mapper.add_table(table(&[("TP53", "7157")], "genesymbol", "entrez", 9606));
        assert_eq!(mapper.map_name("TP53", "genesymbol", "entrez").unwrap(), set(&["7157"]));

        mapper.add_table(table(&[("TP53", "0000")], "genesymbol", "entrez", 9606));
        assert_eq!(mapper.map_name("TP53", "genesymbol", "entrez").unwrap(), set(&["0000"]));
    }

    #[test]
    fn test_genesymbol5_index() {
        let mapper = offline_mapper();
        mapper.add_table(table(
            &[("ABCA12", "Q86UK0"), ("ABCA13", "Q86UQ4"), ("TP53", "P04637")],
            "genesymbol",
            "uniprot",
            9606,
        ));

        let index = mapper.load_genesymbol5(9606).unwrap().unwrap();
        assert_eq!(index.get("ABCA1"), set(&["Q86UK0", "Q86UQ4"]));
        assert!(index.get("TP53").is_empty());
    }

    #[test]
    fn test_shutdown_stops_sweeper() {
        let mapper = Mapper::builder()
            .config(MapperConfig::default().with_use_cache(false))
            .fetcher(Arc::new(MockFetcher::new()))
            .build()
            .unwrap();
        assert!(mapper.sweeper.lock().as_ref().is_some_and(Sweeper::is_running));

        mapper.shutdown();
        assert!(mapper.sweeper.lock().is_none());
    }
}
