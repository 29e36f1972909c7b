//! Loading tables from mapping inputs
//!
//! [`MapReader`] turns one [`MappingInput`] into the requested direction(s) of
//! a translation table. Each backend module returns the `A -> B` dictionary;
//! `B -> A` is derived from it. Results go through the disk cache.
//!
//! Unavailable backends (transport failures, error statuses, failed ID mapping
//! jobs) produce no table; garbled data is an error.

pub mod biomart;
pub mod file;
pub mod pro;
pub mod small_molecule;
pub mod uniprot;
pub mod uniprot_list;

use crate::cache::{CacheSlot, DiskCache};
use crate::config::MapperConfig;
use crate::error::{MappingError, Result};
use crate::http::Fetcher;
use crate::input::MappingInput;
use crate::organism::NOT_ORGANISM_SPECIFIC;
use crate::reference::ReferenceLists;
use crate::table::{swap_dict, MappingData, MappingTable};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Everything a backend needs to reach its data
pub struct ReadContext<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub config: &'a MapperConfig,
    pub cache: Option<&'a DiskCache>,
    pub references: &'a ReferenceLists,
}

impl<'a> ReadContext<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        config: &'a MapperConfig,
        cache: Option<&'a DiskCache>,
        references: &'a ReferenceLists,
    ) -> Self {
        Self {
            fetcher,
            config,
            cache,
            references,
        }
    }
}

/// Output of [`MapReader::load`]; a direction is `None` when not requested or unavailable
#[derive(Debug, Default)]
pub struct LoadedTables {
    pub a_to_b: Option<MappingTable>,
    pub b_to_a: Option<MappingTable>,
}

pub struct MapReader<'a> {
    input: &'a MappingInput,
    ncbi_tax_id: u32,
    id_type_a: String,
    id_type_b: String,
    load_a_to_b: bool,
    load_b_to_a: bool,
    ctx: &'a ReadContext<'a>,
}

impl<'a> MapReader<'a> {
    pub fn new(input: &'a MappingInput, ncbi_tax_id: u32, ctx: &'a ReadContext<'a>) -> Self {
        let ncbi_tax_id = if input.organism_specific() {
            ncbi_tax_id
        } else {
            NOT_ORGANISM_SPECIFIC
        };
        Self {
            input,
            ncbi_tax_id,
            id_type_a: input.id_type_a().to_string(),
            id_type_b: input.id_type_b().to_string(),
            load_a_to_b: true,
            load_b_to_a: false,
            ctx,
        }
    }

    /// Label the resulting tables with different ID type names than the input's own
    pub fn with_id_types(mut self, id_type_a: &str, id_type_b: &str) -> Self {
        self.id_type_a = id_type_a.to_string();
        self.id_type_b = id_type_b.to_string();
        self
    }

    pub fn directions(mut self, a_to_b: bool, b_to_a: bool) -> Self {
        self.load_a_to_b = a_to_b;
        self.load_b_to_a = b_to_a;
        self
    }

    pub fn ncbi_tax_id(&self) -> u32 {
        self.ncbi_tax_id
    }

    pub fn load(&self) -> Result<LoadedTables> {
        let params = self.input.cache_params(self.ncbi_tax_id);
        let cache = self.ctx.cache.filter(|_| self.ctx.config.use_cache);

        if let Some(cache) = cache {
            let a_to_b = self
                .load_a_to_b
                .then(|| cache.read::<MappingData>(&params, CacheSlot::AToB));
            let b_to_a = self
                .load_b_to_a
                .then(|| cache.read::<MappingData>(&params, CacheSlot::BToA));

            let complete = a_to_b.as_ref().is_none_or(Option::is_some)
                && b_to_a.as_ref().is_none_or(Option::is_some);
            if complete {
                debug!(backend = self.input.backend(), "Tables loaded from cache");
                return Ok(self.tables(a_to_b.flatten(), b_to_a.flatten()));
            }
        }

        let a_to_b = match self.read_backend() {
            Ok(data) => data,
            Err(e) if e.is_unavailable() => {
                warn!(
                    backend = self.input.backend(),
                    id_type_a = %self.id_type_a,
                    id_type_b = %self.id_type_b,
                    ncbi_tax_id = self.ncbi_tax_id,
                    error = %e,
                    "Backend unavailable"
                );
                return Ok(LoadedTables::default());
            },
            Err(MappingError::UnsupportedOrganism { backend, ncbi_tax_id }) => {
                debug!(backend = %backend, ncbi_tax_id, "Backend does not cover this organism");
                return Ok(LoadedTables::default());
            },
            Err(e) => return Err(e),
        };

        if a_to_b.is_empty() {
            info!(
                backend = self.input.backend(),
                id_type_a = %self.id_type_a,
                id_type_b = %self.id_type_b,
                "Backend returned no mappings"
            );
            return Ok(LoadedTables::default());
        }

        let b_to_a = self.load_b_to_a.then(|| swap_dict(&a_to_b));
        let a_to_b = self.load_a_to_b.then_some(a_to_b);

        if let Some(cache) = cache {
            for (slot, data) in [(CacheSlot::AToB, &a_to_b), (CacheSlot::BToA, &b_to_a)] {
                if let Some(data) = data {
                    if let Err(e) = cache.write(&params, slot, data) {
                        warn!(error = %e, "Failed to write table cache");
                    }
                }
            }
        }

        info!(
            backend = self.input.backend(),
            id_type_a = %self.id_type_a,
            id_type_b = %self.id_type_b,
            ncbi_tax_id = self.ncbi_tax_id,
            entries = a_to_b.as_ref().or(b_to_a.as_ref()).map(|d| d.len()).unwrap_or(0),
            "Loaded mapping table"
        );
        Ok(self.tables(a_to_b, b_to_a))
    }

    fn tables(&self, a_to_b: Option<MappingData>, b_to_a: Option<MappingData>) -> LoadedTables {
        let lifetime = self.ctx.config.table_lifetime();
        LoadedTables {
            a_to_b: a_to_b.map(|data| {
                MappingTable::new(data, &self.id_type_a, &self.id_type_b, self.ncbi_tax_id, lifetime)
            }),
            b_to_a: b_to_a.map(|data| {
                MappingTable::new(data, &self.id_type_b, &self.id_type_a, self.ncbi_tax_id, lifetime)
            }),
        }
    }

    fn read_backend(&self) -> Result<MappingData> {
        let ctx = self.ctx;
        let tax = self.ncbi_tax_id;
        match self.input {
            MappingInput::File(input) => file::read(input, tax, ctx),
            MappingInput::Uniprot { id_type, swissprot } => uniprot::read(id_type, *swissprot, tax, ctx),
            MappingInput::UniprotList {
                id_type_a,
                id_type_b,
                uniprots,
            } => uniprot_list::read(id_type_a, id_type_b, uniprots.as_deref(), tax, ctx),
            MappingInput::Pro { id_type } => pro::read(id_type, ctx),
            MappingInput::Biomart { id_type_a, id_type_b } => biomart::read(id_type_a, id_type_b, tax, ctx),
            MappingInput::Array { vendor, id_type } => biomart::read_array(vendor, id_type, tax, ctx),
            MappingInput::Unichem { id_type_a, id_type_b } => small_molecule::read_unichem(id_type_a, id_type_b, ctx),
            MappingInput::Ramp { id_type_a, id_type_b } => small_molecule::read_ramp(id_type_a, id_type_b, ctx),
            MappingInput::Hmdb { id_type_a, id_type_b } => small_molecule::read_hmdb(id_type_a, id_type_b, ctx),
        }
    }
}

/// Add `a -> b` unless either side is blank
pub(crate) fn insert_pair(data: &mut MappingData, a: &str, b: &str) {
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() {
        return;
    }
    data.entry(a.to_string()).or_insert_with(HashSet::new).insert(b.to_string());
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{Endpoints, MapperConfig};
    use crate::http::MockFetcher;
    use crate::input::{FileInput, FileSource};
    use pretty_assertions::assert_eq;

    fn url_input(url: &str) -> MappingInput {
        MappingInput::File(FileInput::new("genesymbol", "uniprot", FileSource::Url(url.to_string()), 0, 1))
    }

    #[test]
    fn test_both_directions() {
        let config = MapperConfig::default().with_use_cache(false);
        let fetcher = MockFetcher::new().with_response("http://mock/map.tsv", "TP53\tP04637\nBRCA1\tP38398\n");
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &refs);

        let input = url_input("http://mock/map.tsv");
        let loaded = MapReader::new(&input, 9606, &ctx).directions(true, true).load().unwrap();

        let forward = loaded.a_to_b.unwrap();
        let backward = loaded.b_to_a.unwrap();
        assert_eq!(forward.id_type(), "genesymbol");
        assert_eq!(backward.id_type(), "uniprot");
        assert_eq!(forward.get("TP53"), HashSet::from(["P04637".to_string()]));
        assert_eq!(backward.get("P38398"), HashSet::from(["BRCA1".to_string()]));
    }

    #[test]
    fn test_unavailable_backend_yields_no_table() {
        let config = MapperConfig::default().with_use_cache(false);
        let fetcher = MockFetcher::new().with_status("http://mock/map.tsv", 503);
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &refs);

        let input = url_input("http://mock/map.tsv");
        let loaded = MapReader::new(&input, 9606, &ctx).load().unwrap();
        assert!(loaded.a_to_b.is_none());
        assert!(loaded.b_to_a.is_none());
    }

    #[test]
    fn test_organism_without_dataset_yields_no_table() {
        let config = MapperConfig::default()
            .with_use_cache(false)
            .with_endpoints(Endpoints::all_at("http://mock"));
        let fetcher = MockFetcher::new();
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &refs);

        let input = MappingInput::Biomart {
            id_type_a: "ensg".to_string(),
            id_type_b: "enst".to_string(),
        };
        let loaded = MapReader::new(&input, 4932, &ctx).load().unwrap();
        assert!(loaded.a_to_b.is_none());
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn test_failed_job_yields_no_table() {
        let config = MapperConfig::default()
            .with_use_cache(false)
            .with_endpoints(Endpoints::all_at("http://mock"));
        let fetcher = MockFetcher::new()
            .with_response("http://mock/idmapping/run", r#"{"jobId":"bad"}"#)
            .with_response(
                "http://mock/idmapping/status/bad",
                r#"{"jobStatus":"ERROR","messages":["Invalid from database"]}"#,
            );
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &refs);

        let input = MappingInput::UniprotList {
            id_type_a: "uniprot".to_string(),
            id_type_b: "entrez".to_string(),
            uniprots: Some(vec!["P04637".to_string()]),
        };
        let loaded = MapReader::new(&input, 9606, &ctx).load().unwrap();
        assert!(loaded.a_to_b.is_none());
        assert_eq!(fetcher.request_count("http://mock/idmapping/status/bad"), 1);
    }

    #[test]
    fn test_cache_skips_network_on_second_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DiskCache::new(dir.path());
        let config = MapperConfig::default()
            .with_cache_dir(dir.path())
            .with_endpoints(Endpoints::all_at("http://mock"));
        let fetcher = MockFetcher::new().with_response("http://mock/map.tsv", "TP53\tP04637\n");
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, Some(&cache), &refs);

        let input = url_input("http://mock/map.tsv");
        MapReader::new(&input, 9606, &ctx).directions(true, true).load().unwrap();
        let again = MapReader::new(&input, 9606, &ctx).directions(false, true).load().unwrap();

        assert_eq!(fetcher.requests().len(), 1);
        assert!(again.a_to_b.is_none());
        assert_eq!(again.b_to_a.unwrap().get("P04637"), HashSet::from(["TP53".to_string()]));
    }

    #[test]
    fn test_organism_agnostic_input_uses_sentinel() {
        let config = MapperConfig::default().with_use_cache(false);
        let fetcher = MockFetcher::new();
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &refs);

        let input = MappingInput::Unichem {
            id_type_a: "chebi".to_string(),
            id_type_b: "hmdb".to_string(),
        };
        assert_eq!(MapReader::new(&input, 9606, &ctx).ncbi_tax_id(), NOT_ORGANISM_SPECIFIC);
    }
}
