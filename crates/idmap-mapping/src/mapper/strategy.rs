//! The fallback cascade of `map_name`
//!
//! Strategies run in [`CASCADE`] order; the first non-empty result wins.
//! Each strategy decides for itself whether it applies to the ID type pair.
//! Retries on a rewritten name (case variants, stripped versions, removed
//! prefixes) go through the [`PRIMARY`] strategies only, so a rewrite never
//! triggers further rewrites of itself.

use super::special;
use super::Mapper;
use super::MapOptions;
use crate::error::Result;
use crate::id_types::{
    self, GENESYMBOL, GENESYMBOL5, GENESYMBOL_SYN, MIR_MAT_NAME, MIR_NAME, TREMBL, UNIPROT, UNIPROT_PRI,
    UNIPROT_SEC,
};
use crate::organism::NOT_ORGANISM_SPECIFIC;
use std::collections::HashSet;
use tracing::debug;

/// One translation request as seen by the strategies
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    pub name: &'a str,
    pub id_type: &'a str,
    pub target_id_type: &'a str,
    pub ncbi_tax_id: u32,
    pub options: &'a MapOptions,
}

impl<'a> Query<'a> {
    fn with_name<'b>(&self, name: &'b str) -> Query<'b>
    where
        'a: 'b,
    {
        Query {
            name,
            id_type: self.id_type,
            target_id_type: self.target_id_type,
            ncbi_tax_id: self.ncbi_tax_id,
            options: self.options,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// RefSeq versions, Ensembl peptide aliases, probe chains
    Special,
    /// Plain lookup in the `id_type -> target` table
    Direct,
    /// UniProt -> gene symbol through TrEMBL, then secondary accessions
    UniprotGenesymbol,
    /// Mature and precursor miRNA names tried as each other
    Mirna,
    /// Gene symbol to or from a non-UniProt type, through UniProt
    ViaUniprot,
    /// Upper, capitalized and lower case
    CaseVariants,
    /// `ENSG00000141510.17` -> `ENSG00000141510`
    EnsemblVersion,
    /// `HGNC:11998` -> `11998`
    ColonPrefix,
    /// Synonyms, a trailing `1`, and the 5-character prefix index
    GenesymbolFallbacks,
}

pub const CASCADE: [Strategy; 9] = [
    Strategy::Special,
    Strategy::Direct,
    Strategy::UniprotGenesymbol,
    Strategy::Mirna,
    Strategy::ViaUniprot,
    Strategy::CaseVariants,
    Strategy::EnsemblVersion,
    Strategy::ColonPrefix,
    Strategy::GenesymbolFallbacks,
];

pub const PRIMARY: [Strategy; 5] = [
    Strategy::Special,
    Strategy::Direct,
    Strategy::UniprotGenesymbol,
    Strategy::Mirna,
    Strategy::ViaUniprot,
];

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Special => "special",
            Strategy::Direct => "direct",
            Strategy::UniprotGenesymbol => "uniprot_genesymbol",
            Strategy::Mirna => "mirna",
            Strategy::ViaUniprot => "via_uniprot",
            Strategy::CaseVariants => "case_variants",
            Strategy::EnsemblVersion => "ensembl_version",
            Strategy::ColonPrefix => "colon_prefix",
            Strategy::GenesymbolFallbacks => "genesymbol_fallbacks",
        }
    }

    pub fn applies(self, query: &Query<'_>) -> bool {
        let (a, b) = (query.id_type, query.target_id_type);
        match self {
            Strategy::Special => special::applies(a, b),
            Strategy::Direct => !special::applies(a, b),
            Strategy::UniprotGenesymbol => a == UNIPROT && b == GENESYMBOL,
            Strategy::Mirna => id_types::is_mirna_name(a),
            Strategy::ViaUniprot => {
                let via = |gs: &str, other: &str| {
                    gs == GENESYMBOL && other != GENESYMBOL && !id_types::is_uniprot_like(other)
                };
                via(a, b) || via(b, a)
            },
            Strategy::CaseVariants => true,
            Strategy::EnsemblVersion => id_types::is_ensembl(a) && strip_version(query.name).is_some(),
            Strategy::ColonPrefix => query.name.contains(':'),
            Strategy::GenesymbolFallbacks => a == GENESYMBOL,
        }
    }

    fn attempt(self, mapper: &Mapper, query: &Query<'_>) -> Result<HashSet<String>> {
        match self {
            Strategy::Special => special::translate(mapper, query),
            Strategy::Direct => mapper.lookup(query.name, query.id_type, query.target_id_type, query.ncbi_tax_id),
            Strategy::UniprotGenesymbol => uniprot_genesymbol(mapper, query),
            Strategy::Mirna => {
                let other = if query.id_type == MIR_NAME { MIR_MAT_NAME } else { MIR_NAME };
                if other == query.target_id_type {
                    return Ok(HashSet::new());
                }
                mapper.lookup(query.name, other, query.target_id_type, query.ncbi_tax_id)
            },
            Strategy::ViaUniprot => {
                let hop = query.options.hop(query.ncbi_tax_id);
                let uniprots = mapper.map_name_with(query.name, query.id_type, UNIPROT, &hop)?;
                mapper.map_names(&uniprots, UNIPROT, query.target_id_type, &hop)
            },
            Strategy::CaseVariants => {
                for variant in case_variants(query.name, query.id_type) {
                    let result = run_strategies(mapper, &query.with_name(&variant), &PRIMARY)?;
                    if !result.is_empty() {
                        return Ok(result);
                    }
                }
                Ok(HashSet::new())
            },
            Strategy::EnsemblVersion => match strip_version(query.name) {
                Some(unversioned) => run_strategies(mapper, &query.with_name(unversioned), &PRIMARY),
                None => Ok(HashSet::new()),
            },
            Strategy::ColonPrefix => match query.name.split_once(':') {
                Some((_, rest)) if !rest.is_empty() => {
                    let hop = query.options.hop(query.ncbi_tax_id);
                    mapper.map_name_with(rest, query.id_type, query.target_id_type, &hop)
                },
                _ => Ok(HashSet::new()),
            },
            Strategy::GenesymbolFallbacks => genesymbol_fallbacks(mapper, query),
        }
    }
}

/// Run the full cascade
pub fn run(mapper: &Mapper, query: &Query<'_>) -> Result<HashSet<String>> {
    run_strategies(mapper, query, &CASCADE)
}

fn run_strategies(mapper: &Mapper, query: &Query<'_>, strategies: &[Strategy]) -> Result<HashSet<String>> {
    for strategy in strategies {
        if !strategy.applies(query) {
            continue;
        }
        let result = strategy.attempt(mapper, query)?;
        if !result.is_empty() {
            if *strategy != Strategy::Direct {
                debug!(
                    strategy = strategy.name(),
                    name = query.name,
                    id_type = query.id_type,
                    target_id_type = query.target_id_type,
                    "Fallback translation"
                );
            }
            return Ok(result);
        }
    }
    Ok(HashSet::new())
}

fn uniprot_genesymbol(mapper: &Mapper, query: &Query<'_>) -> Result<HashSet<String>> {
    let trembl = mapper.lookup(query.name, TREMBL, GENESYMBOL, query.ncbi_tax_id)?;
    if !trembl.is_empty() {
        return Ok(trembl);
    }

    let mut result = HashSet::new();
    for primary in mapper.lookup(query.name, UNIPROT_SEC, UNIPROT_PRI, NOT_ORGANISM_SPECIFIC)? {
        if primary == query.name {
            continue;
        }
        let mapped = mapper.lookup(&primary, UNIPROT, GENESYMBOL, query.ncbi_tax_id)?;
        if mapped.is_empty() {
            result.extend(mapper.lookup(&primary, TREMBL, GENESYMBOL, query.ncbi_tax_id)?);
        } else {
            result.extend(mapped);
        }
    }
    Ok(result)
}

fn genesymbol_fallbacks(mapper: &Mapper, query: &Query<'_>) -> Result<HashSet<String>> {
    let hop = query.options.hop(query.ncbi_tax_id);

    let synonyms = mapper.lookup(query.name, GENESYMBOL_SYN, UNIPROT, query.ncbi_tax_id)?;
    let via_synonyms = if query.target_id_type == UNIPROT {
        synonyms
    } else {
        mapper.map_names(&synonyms, UNIPROT, query.target_id_type, &hop)?
    };
    if !via_synonyms.is_empty() {
        return Ok(via_synonyms);
    }

    if query.options.strict {
        return Ok(HashSet::new());
    }

    let suffixed = format!("{}1", query.name);
    let result = run_strategies(mapper, &query.with_name(&suffixed), &PRIMARY)?;
    if !result.is_empty() {
        return Ok(result);
    }

    if query.target_id_type == UNIPROT {
        return mapper.lookup(query.name, GENESYMBOL5, UNIPROT, query.ncbi_tax_id);
    }
    Ok(HashSet::new())
}

/// Upper case, then capitalized (not for UniProt-like types), then lower case;
/// variants equal to `name` are skipped
fn case_variants(name: &str, id_type: &str) -> Vec<String> {
    let mut variants = vec![name.to_uppercase()];
    if !id_types::is_uniprot_like(id_type) {
        variants.push(capitalize(name));
    }
    variants.push(name.to_lowercase());

    let mut seen = HashSet::new();
    variants
        .into_iter()
        .filter(|v| v != name && seen.insert(v.clone()))
        .collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `ENST00000269305.9` -> `ENST00000269305`; `None` without a numeric version
pub(crate) fn strip_version(name: &str) -> Option<&str> {
    let (base, version) = name.rsplit_once('.')?;
    (!base.is_empty() && !version.is_empty() && version.chars().all(|c| c.is_ascii_digit())).then_some(base)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::mapper::tests::{offline_mapper, set, table};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_case_variants() {
        assert_eq!(case_variants("tp53", GENESYMBOL), vec!["TP53", "Tp53"]);
        assert_eq!(case_variants("Tp53", GENESYMBOL), vec!["TP53", "tp53"]);
        assert_eq!(case_variants("p04637", UNIPROT), vec!["P04637"]);
    }

    #[test]
    fn test_strip_version() {
        assert_eq!(strip_version("ENSG00000141510.17"), Some("ENSG00000141510"));
        assert_eq!(strip_version("ENSG00000141510"), None);
        assert_eq!(strip_version("ENSG00000141510.x"), None);
    }

    #[test]
    fn test_cascade_order() {
        assert_eq!(CASCADE[0], Strategy::Special);
        assert_eq!(CASCADE[CASCADE.len() - 1], Strategy::GenesymbolFallbacks);
        assert!(PRIMARY.iter().all(|s| CASCADE.contains(s)));
        assert!(!PRIMARY.contains(&Strategy::CaseVariants));
    }

    #[test]
    fn test_uppercase_fallback() {
        let mapper = offline_mapper();
        mapper.add_table(table(&[("BRCA1", "672")], GENESYMBOL, "entrez", 9606));
        assert_eq!(mapper.map_name("brca1", GENESYMBOL, "entrez").unwrap(), set(&["672"]));
    }

    #[test]
    fn test_ensembl_version_fallback() {
        let mapper = offline_mapper();
        mapper.add_table(table(&[("ENSG00000141510", "7157")], "ensg", "entrez", 9606));
        assert_eq!(mapper.map_name("ENSG00000141510.17", "ensg", "entrez").unwrap(), set(&["7157"]));
    }

    #[test]
    fn test_colon_prefix_fallback() {
        let mapper = offline_mapper();
        mapper.add_table(table(&[("11998", "7157")], "hgnc", "entrez", 9606));
        assert_eq!(mapper.map_name("HGNC:11998", "hgnc", "entrez").unwrap(), set(&["7157"]));
    }

    #[test]
    fn test_via_uniprot() {
        let mapper = offline_mapper();
        mapper.add_table(table(&[("TP53", "P04637")], GENESYMBOL, UNIPROT, 9606));
        mapper.add_table(table(&[("P04637", "7157")], UNIPROT, "entrez", 9606));

        let options = MapOptions::default().uniprot_cleanup(false);
        assert_eq!(mapper.map_name_with("TP53", GENESYMBOL, "entrez", &options).unwrap(), set(&["7157"]));
    }

    #[test]
    fn test_genesymbol_synonym_and_suffix() {
        let mapper = offline_mapper();
        mapper.add_table(table(&[("P53", "7157"), ("ORC1", "4998")], GENESYMBOL, "entrez", 9606));
        mapper.add_table(table(&[("ORC1L", "Q13415")], GENESYMBOL_SYN, UNIPROT, 9606));
        mapper.add_table(table(&[("Q13415", "4998")], UNIPROT, "entrez", 9606));

        assert_eq!(mapper.map_name("ORC1L", GENESYMBOL, "entrez").unwrap(), set(&["4998"]));
        assert_eq!(mapper.map_name("ORC", GENESYMBOL, "entrez").unwrap(), set(&["4998"]));

        let strict = MapOptions::default().strict(true);
        assert!(mapper.map_name_with("ORC", GENESYMBOL, "entrez", &strict).unwrap().is_empty());
    }

    #[test]
    fn test_mirna_name_retry() {
        let mapper = offline_mapper();
        mapper.add_table(table(&[("hsa-mir-21", "MI0000077")], MIR_NAME, "mir-pre", 9606));
        assert_eq!(mapper.map_name("hsa-mir-21", MIR_MAT_NAME, "mir-pre").unwrap(), set(&["MI0000077"]));
    }
}
