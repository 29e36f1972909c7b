//! End-to-end translation scenarios
//!
//! These tests drive the public `Mapper` API against canned backend responses:
//! - Direct translation, first-element access, case fallback and misses
//! - Memoization and idempotence
//! - Reverse derivation
//! - Expiry, manual and by the background sweep
//! - Complexes
//! - Organisms no backend covers
//! - UniProt cleanup with supplied reference lists

use idmap_mapping::config::Endpoints;
use idmap_mapping::{
    only_uniprot_ac, MapOptions, Mapper, MapperConfig, MappingData, MappingError, MappingTable, MappingTableKey,
    MockFetcher, ReferenceKind,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

const GENE_PRIMARY_STREAM: &str =
    "http://mock/uniprotkb/stream?query=organism_id%3A9606+AND+reviewed%3Atrue&fields=accession%2Cgene_primary";

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn human_gene_symbols() -> MockFetcher {
    MockFetcher::new().with_response(
        GENE_PRIMARY_STREAM,
        "Entry\tGene Names (primary)\nP04637\tTP53\nP38398\tBRCA1\n",
    )
}

fn mapper_with(fetcher: Arc<MockFetcher>) -> Mapper {
    let config = MapperConfig::default()
        .with_use_cache(false)
        .with_endpoints(Endpoints::all_at("http://mock"));
    let mapper = Mapper::builder()
        .config(config)
        .fetcher(fetcher)
        .background_cleanup(false)
        .build()
        .unwrap();
    mapper.set_reference_list(9606, ReferenceKind::All, set(&["P04637", "P38398"]));
    mapper.set_reference_list(9606, ReferenceKind::Trembl, HashSet::new());
    mapper
}

fn table(pairs: &[(&str, &str)], id_type: &str, target: &str, lifetime: Duration) -> MappingTable {
    let mut data = MappingData::new();
    for (a, b) in pairs {
        data.entry(a.to_string()).or_default().insert(b.to_string());
    }
    MappingTable::new(data, id_type, target, 9606, lifetime)
}

// ============================================================================
// Translation
// ============================================================================

#[test]
fn test_gene_symbol_to_uniprot() {
    let fetcher = Arc::new(human_gene_symbols());
    let mapper = mapper_with(Arc::clone(&fetcher));

    assert_eq!(mapper.map_name("TP53", "genesymbol", "uniprot").unwrap(), set(&["P04637"]));
    assert_eq!(
        mapper
            .map_name0("TP53", "genesymbol", "uniprot", &MapOptions::default())
            .unwrap(),
        Some("P04637".to_string())
    );
    assert_eq!(mapper.map_name("tp53", "genesymbol", "uniprot").unwrap(), set(&["P04637"]));
    assert!(mapper.map_name("TP99999", "genesymbol", "uniprot").unwrap().is_empty());

    // both directions came from one download
    assert_eq!(fetcher.request_count(GENE_PRIMARY_STREAM), 1);
}

#[test]
fn test_uppercase_fallback() {
    let mapper = mapper_with(Arc::new(MockFetcher::new()));
    mapper.add_table(table(&[("BRCA1", "P38398")], "genesymbol", "uniprot", Duration::from_secs(300)));

    assert_eq!(mapper.map_name("brca1", "genesymbol", "uniprot").unwrap(), set(&["P38398"]));
}

#[test]
fn test_miss_is_empty_not_error() {
    let mapper = mapper_with(Arc::new(MockFetcher::new()));
    let result = mapper.map_name("not-a-real-id", "genesymbol", "uniprot").unwrap();
    assert!(result.is_empty());
    assert_eq!(mapper.map_name0("not-a-real-id", "genesymbol", "uniprot", &MapOptions::default()).unwrap(), None);
}

#[test]
fn test_map_names_is_union() {
    let mapper = mapper_with(Arc::new(human_gene_symbols()));
    let result = mapper
        .map_names(["TP53", "BRCA1", "TP99999"], "genesymbol", "uniprot", &MapOptions::default())
        .unwrap();
    assert_eq!(result, set(&["P04637", "P38398"]));
}

#[test]
fn test_repeated_translation_is_memoized() {
    let fetcher = Arc::new(human_gene_symbols());
    let mapper = mapper_with(Arc::clone(&fetcher));

    let first = mapper.map_name("TP53", "genesymbol", "uniprot").unwrap();
    let requests = fetcher.requests().len();
    let second = mapper.map_name("TP53", "genesymbol", "uniprot").unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.requests().len(), requests);
    assert!(mapper.memo_stats().hits >= 1);
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_reverse_table_is_derived() {
    let mapper = mapper_with(Arc::new(MockFetcher::new()));
    mapper.add_table(table(
        &[("TP53", "P04637"), ("BRCA1", "P38398"), ("BRCA1-AS", "P38398")],
        "genesymbol",
        "uniprot",
        Duration::from_secs(300),
    ));

    let forward = mapper.translation_dict("genesymbol", "uniprot", Some(9606)).unwrap().unwrap();
    let reverse = mapper.translation_dict("uniprot", "genesymbol", Some(9606)).unwrap().unwrap();

    for (name, targets) in forward.data() {
        for target in targets {
            assert!(reverse.get(target).contains(name));
        }
    }
    assert_eq!(reverse.get("P38398"), set(&["BRCA1", "BRCA1-AS"]));
    assert_eq!(reverse.reverse().data(), forward.data());
}

#[test]
fn test_zero_lifetime_table_is_evicted() {
    let mapper = mapper_with(Arc::new(MockFetcher::new()));
    let added = mapper.add_table(table(&[("TP53", "P04637")], "genesymbol", "uniprot", Duration::ZERO));
    assert!(added.is_expired(Instant::now()));

    let removed = mapper.remove_expired();
    assert_eq!(removed, vec![MappingTableKey::new("genesymbol", "uniprot", 9606)]);
    assert!(mapper.loaded_keys().is_empty());
}

#[test]
fn test_background_sweep_evicts() {
    let config = MapperConfig::default()
        .with_use_cache(false)
        .with_endpoints(Endpoints::all_at("http://mock"))
        .with_cleanup_period_secs(1);
    let mapper = Mapper::builder()
        .config(config)
        .fetcher(Arc::new(MockFetcher::new()))
        .build()
        .unwrap();
    mapper.add_table(table(&[("TP53", "P04637")], "genesymbol", "uniprot", Duration::ZERO));
    mapper.add_table(table(&[("7157", "P04637")], "entrez", "uniprot", Duration::from_secs(3600)));

    let deadline = Instant::now() + Duration::from_secs(10);
    while mapper.loaded_keys().len() > 1 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(50));
    }
    mapper.shutdown();

    assert_eq!(mapper.loaded_keys(), vec![MappingTableKey::new("entrez", "uniprot", 9606)]);
}

// ============================================================================
// Complexes
// ============================================================================

#[test]
fn test_complex_type_is_rejected() {
    let mapper = mapper_with(Arc::new(MockFetcher::new()));
    let err = mapper.map_name("COMPLEX:P04637_P38398", "complex", "uniprot").unwrap_err();
    assert!(matches!(err, MappingError::ComplexTranslation { .. }));
}

#[test]
fn test_complex_components_are_expanded() {
    let mapper = mapper_with(Arc::new(human_gene_symbols()));

    let expanded = mapper.map_name("COMPLEX:TP53_BRCA1", "genesymbol", "uniprot").unwrap();
    assert_eq!(expanded, set(&["P04637", "P38398"]));

    let kept = mapper
        .map_name_with(
            "COMPLEX:TP53_BRCA1",
            "genesymbol",
            "uniprot",
            &MapOptions::default().expand_complexes(false),
        )
        .unwrap();
    assert_eq!(kept, set(&["COMPLEX:TP53_BRCA1"]));
}

#[test]
fn test_organism_without_backend_data_is_a_miss() {
    let mapper = mapper_with(Arc::new(MockFetcher::new()));
    let yeast = MapOptions::default().organism(4932);

    let transcripts = mapper.map_name_with("ENSG00000141510", "ensg", "enst", &yeast).unwrap();
    assert!(transcripts.is_empty());

    let accessions = mapper
        .map_name_with("sce-miR-1", "mir-mat-name", "mirbase", &yeast)
        .unwrap();
    assert!(accessions.is_empty());
}

// ============================================================================
// UniProt cleanup
// ============================================================================

#[test]
fn test_accession_format_filter() {
    let filtered = only_uniprot_ac(["P12345", "not-an-ac", "Q9Y6K9-2"]);
    assert_eq!(filtered, set(&["P12345", "Q9Y6K9-2"]));
}

#[test]
fn test_cleanup_drops_accessions_outside_proteome() {
    let mapper = mapper_with(Arc::new(MockFetcher::new()));
    mapper.add_table(table(
        &[("TP53", "P04637"), ("TP53", "A0A000")],
        "genesymbol",
        "uniprot",
        Duration::from_secs(300),
    ));

    assert_eq!(mapper.map_name("TP53", "genesymbol", "uniprot").unwrap(), set(&["P04637"]));

    let raw = mapper
        .map_name_with("TP53", "genesymbol", "uniprot", &MapOptions::default().uniprot_cleanup(false))
        .unwrap();
    assert_eq!(raw, set(&["P04637", "A0A000"]));
}

#[test]
fn test_identity_translation_is_cleaned() {
    let mapper = mapper_with(Arc::new(MockFetcher::new()));
    assert_eq!(mapper.map_name("P04637", "uniprot", "uniprot").unwrap(), set(&["P04637"]));
    assert!(mapper.map_name("Q00001", "uniprot", "uniprot").unwrap().is_empty());
    assert_eq!(mapper.map_name("7157", "entrez", "entrez").unwrap(), set(&["7157"]));
}

#[test]
fn test_unavailable_reference_lists_are_not_refetched() {
    let fetcher = Arc::new(MockFetcher::new());
    let config = MapperConfig::default()
        .with_use_cache(false)
        .with_endpoints(Endpoints::all_at("http://mock"));
    let mapper = Mapper::builder()
        .config(config)
        .fetcher(fetcher.clone())
        .background_cleanup(false)
        .build()
        .unwrap();
    mapper.add_table(table(
        &[("TP53", "P04637"), ("BRCA1", "P38398"), ("MDM2", "Q00987")],
        "genesymbol",
        "uniprot",
        Duration::from_secs(300),
    ));

    assert_eq!(mapper.map_name("TP53", "genesymbol", "uniprot").unwrap(), set(&["P04637"]));
    let downloads = fetcher.request_count("http://mock/uniprotkb/stream");
    assert!(downloads > 0);

    assert_eq!(mapper.map_name("BRCA1", "genesymbol", "uniprot").unwrap(), set(&["P38398"]));
    assert_eq!(mapper.map_name("MDM2", "genesymbol", "uniprot").unwrap(), set(&["Q00987"]));
    assert_eq!(fetcher.request_count("http://mock/uniprotkb/stream"), downloads);
}
