//! ID types whose translation replaces the plain lookup
//!
//! - RefSeq: as given, without the version, then each version up to the
//!   configured limit until one translates
//! - Ensembl peptides: the UniProt-derived and the BioMart-derived tables
//! - microarray probes to non-Ensembl types: through an Ensembl peptide

use super::strategy::{strip_version, Query};
use super::Mapper;
use crate::error::Result;
use crate::id_types::{self, ENSP, ENSP_BIOMART};
use std::collections::HashSet;
use tracing::debug;

pub fn applies(id_type: &str, target_id_type: &str) -> bool {
    id_types::is_refseq(id_type)
        || id_type == ENSP
        || (id_types::is_probe(id_type) && !id_types::is_ensembl(target_id_type))
}

pub fn translate(mapper: &Mapper, query: &Query<'_>) -> Result<HashSet<String>> {
    if id_types::is_refseq(query.id_type) {
        refseq(mapper, query)
    } else if query.id_type == ENSP {
        ensp(mapper, query)
    } else if id_types::is_probe(query.id_type) {
        probe(mapper, query)
    } else {
        Ok(HashSet::new())
    }
}

fn refseq(mapper: &Mapper, query: &Query<'_>) -> Result<HashSet<String>> {
    let lookup = |name: &str| mapper.lookup(name, query.id_type, query.target_id_type, query.ncbi_tax_id);

    let result = lookup(query.name)?;
    if !result.is_empty() {
        return Ok(result);
    }

    let unversioned = strip_version(query.name).unwrap_or(query.name);
    if unversioned != query.name {
        let result = lookup(unversioned)?;
        if !result.is_empty() {
            return Ok(result);
        }
    }

    if query.options.strict {
        return Ok(HashSet::new());
    }

    for version in 0..=mapper.config().refseq_version_probe_limit {
        let result = lookup(&format!("{}.{}", unversioned, version))?;
        if !result.is_empty() {
            debug!(name = query.name, version, "Translated through RefSeq version");
            return Ok(result);
        }
    }
    Ok(HashSet::new())
}

fn ensp(mapper: &Mapper, query: &Query<'_>) -> Result<HashSet<String>> {
    for alias in [ENSP, ENSP_BIOMART] {
        if alias == query.target_id_type {
            continue;
        }
        let result = mapper.lookup(query.name, alias, query.target_id_type, query.ncbi_tax_id)?;
        if !result.is_empty() {
            return Ok(result);
        }
    }
    Ok(HashSet::new())
}

fn probe(mapper: &Mapper, query: &Query<'_>) -> Result<HashSet<String>> {
    let peptides = mapper.lookup(query.name, query.id_type, ENSP_BIOMART, query.ncbi_tax_id)?;
    let hop = query.options.hop(query.ncbi_tax_id);
    mapper.map_names(&peptides, ENSP, query.target_id_type, &hop)
}
