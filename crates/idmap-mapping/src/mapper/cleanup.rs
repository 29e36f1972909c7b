//! UniProt cleanup pipeline
//!
//! Applied to every non-empty result with a `uniprot` target:
//!
//! 1. secondary accessions -> primary accessions
//! 2. TrEMBL -> SwissProt through the gene symbol (`trembl_swissprot_by_genesymbol`)
//! 3. deleted accessions -> current ones through UniSave (`translate_deleted_uniprot`)
//! 4. drop accessions missing from the organism's proteome (unless `keep_invalid_uniprot`)
//! 5. drop strings that are not UniProt accessions

use super::{MapOptions, Mapper};
use crate::error::Result;
use crate::id_types::{GENESYMBOL, UNIPROT, UNIPROT_PRI, UNIPROT_SEC};
use crate::organism::NOT_ORGANISM_SPECIFIC;
use crate::reader::uniprot::deleted_genesymbols;
use crate::reference::ReferenceKind;
use crate::uniprot::{only_uniprot_ac, strip_isoform};
use std::collections::HashSet;
use tracing::{debug, warn};

impl Mapper {
    pub fn uniprot_cleanup(&self, uniprots: HashSet<String>, ncbi_tax_id: u32) -> Result<HashSet<String>> {
        let mut uniprots = self.primary_uniprot(uniprots, ncbi_tax_id)?;

        if self.config.trembl_swissprot_by_genesymbol {
            uniprots = self.trembl_swissprot(uniprots, ncbi_tax_id)?;
        }
        if self.config.translate_deleted_uniprot {
            uniprots = self.translate_deleted(uniprots, ncbi_tax_id)?;
        }
        if !self.config.keep_invalid_uniprot {
            uniprots = self.only_valid_uniprots(uniprots, ncbi_tax_id);
        }

        Ok(only_uniprot_ac(uniprots))
    }

    /// Replace secondary accessions by their primary accessions
    pub fn primary_uniprot(&self, uniprots: HashSet<String>, _ncbi_tax_id: u32) -> Result<HashSet<String>> {
        let Some(table) = self.which_table(UNIPROT_SEC, UNIPROT_PRI, NOT_ORGANISM_SPECIFIC, true)? else {
            return Ok(uniprots);
        };

        let mut result = HashSet::with_capacity(uniprots.len());
        for uniprot in uniprots {
            let primaries = table.get(&uniprot);
            if primaries.is_empty() {
                result.insert(uniprot);
            } else {
                debug!(secondary = %uniprot, primaries = primaries.len(), "Secondary accession replaced");
                result.extend(primaries);
            }
        }
        Ok(result)
    }

    /// Replace TrEMBL accessions by SwissProt accessions sharing their gene symbol
    pub fn trembl_swissprot(&self, uniprots: HashSet<String>, ncbi_tax_id: u32) -> Result<HashSet<String>> {
        let trembl = self.references.get(&self.read_context(), ncbi_tax_id, ReferenceKind::Trembl);
        if trembl.is_empty() {
            return Ok(uniprots);
        }

        let options = hop_options(ncbi_tax_id);
        let mut result = HashSet::with_capacity(uniprots.len());
        for uniprot in uniprots {
            if !trembl.contains(&uniprot) {
                result.insert(uniprot);
                continue;
            }
            let symbols = self.map_name_with(&uniprot, UNIPROT, GENESYMBOL, &options)?;
            let swissprots = self.map_names(&symbols, GENESYMBOL, UNIPROT, &options)?;
            if swissprots.is_empty() {
                result.insert(uniprot);
            } else {
                result.extend(swissprots);
            }
        }
        Ok(result)
    }

    /// Re-translate accessions missing from the proteome through the gene
    /// symbol of their last archived version
    fn translate_deleted(&self, uniprots: HashSet<String>, ncbi_tax_id: u32) -> Result<HashSet<String>> {
        let ctx = self.read_context();
        let all = self.references.get(&ctx, ncbi_tax_id, ReferenceKind::All);
        if all.is_empty() {
            return Ok(uniprots);
        }

        let options = hop_options(ncbi_tax_id);
        let mut result = HashSet::with_capacity(uniprots.len());
        for uniprot in uniprots {
            if all.contains(strip_isoform(&uniprot)) {
                result.insert(uniprot);
                continue;
            }

            let symbols = match deleted_genesymbols(strip_isoform(&uniprot), &ctx) {
                Ok(symbols) => symbols,
                Err(e) if e.is_unavailable() => {
                    warn!(uniprot = %uniprot, error = %e, "UniSave unavailable");
                    HashSet::new()
                },
                Err(e) => return Err(e),
            };
            let current = self.map_names(&symbols, GENESYMBOL, UNIPROT, &options)?;
            if current.is_empty() {
                result.insert(uniprot);
            } else {
                debug!(deleted = %uniprot, current = current.len(), "Deleted accession translated");
                result.extend(current);
            }
        }
        Ok(result)
    }

    /// Keep accessions of the organism's proteome; unchanged when the list is unavailable
    pub fn only_valid_uniprots(&self, uniprots: HashSet<String>, ncbi_tax_id: u32) -> HashSet<String> {
        let all = self.references.get(&self.read_context(), ncbi_tax_id, ReferenceKind::All);
        if all.is_empty() {
            warn!(ncbi_tax_id, "No reference proteome, accessions not validated");
            return uniprots;
        }
        uniprots
            .into_iter()
            .filter(|u| all.contains(strip_isoform(u)))
            .collect()
    }
}

fn hop_options(ncbi_tax_id: u32) -> MapOptions {
    MapOptions::default()
        .organism(ncbi_tax_id)
        .strict(true)
        .uniprot_cleanup(false)
}
