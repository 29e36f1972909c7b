//! Where tables come from
//!
//! Predefined resources are fixed ID type pairs with a known input. Implicit
//! resources are backend families that can serve any pair satisfying their
//! eligibility rule (both sides have a BioMart attribute, a UniChem source
//! number, ...). Both are matched in either orientation.

use crate::config::MapperConfig;
use crate::id_types::{
    self, GENESYMBOL, MIRBASE, MIR_MAT_NAME, MIR_NAME, MIR_PRE, PRO, TREMBL, UNIPROT, UNIPROT_PRI, UNIPROT_SEC,
};
use crate::input::{FileInput, FileSource, GeneratedTable, MappingInput};
use crate::organism;

/// A mapping input together with the ID type names its tables are labelled with
#[derive(Debug, Clone)]
pub struct Resource {
    pub id_type_a: String,
    pub id_type_b: String,
    pub input: MappingInput,
}

impl Resource {
    fn new(input: MappingInput) -> Self {
        Self {
            id_type_a: input.id_type_a().to_string(),
            id_type_b: input.id_type_b().to_string(),
            input,
        }
    }

    fn labelled(input: MappingInput, id_type_a: &str, id_type_b: &str) -> Self {
        Self {
            id_type_a: id_type_a.to_string(),
            id_type_b: id_type_b.to_string(),
            input,
        }
    }

    /// Directions to load, `(a_to_b, b_to_a)`, to translate `id_type -> target_id_type`
    pub fn directions_for(&self, id_type: &str, target_id_type: &str) -> Option<(bool, bool)> {
        if self.id_type_a == id_type && self.id_type_b == target_id_type {
            Some((true, false))
        } else if self.id_type_b == id_type && self.id_type_a == target_id_type {
            Some((false, true))
        } else {
            None
        }
    }

    pub fn backend(&self) -> &'static str {
        self.input.backend()
    }
}

/// The unordered pair `{x, y}` equals `{a, b}`
fn pair_is(x: &str, y: &str, a: &str, b: &str) -> bool {
    (x == a && y == b) || (x == b && y == a)
}

/// The statically declared resource for this pair, if any
pub fn predefined(id_type: &str, target_id_type: &str) -> Option<Resource> {
    let (x, y) = (id_type, target_id_type);

    if pair_is(x, y, UNIPROT_SEC, UNIPROT_PRI) {
        return Some(Resource::new(MappingInput::File(FileInput::new(
            UNIPROT_SEC,
            UNIPROT_PRI,
            FileSource::Generated(GeneratedTable::UniprotSecondary),
            0,
            1,
        ))));
    }
    if pair_is(x, y, MIR_MAT_NAME, MIRBASE) {
        return Some(Resource::new(MappingInput::File(FileInput::new(
            MIR_MAT_NAME,
            MIRBASE,
            FileSource::Generated(GeneratedTable::MirbaseMature),
            0,
            1,
        ))));
    }
    if pair_is(x, y, MIR_NAME, MIR_PRE) {
        return Some(Resource::new(MappingInput::File(FileInput::new(
            MIR_NAME,
            MIR_PRE,
            FileSource::Generated(GeneratedTable::MirbaseHairpin),
            0,
            1,
        ))));
    }
    if pair_is(x, y, TREMBL, GENESYMBOL) {
        return Some(Resource::labelled(
            MappingInput::Uniprot {
                id_type: GENESYMBOL.to_string(),
                swissprot: Some(false),
            },
            TREMBL,
            GENESYMBOL,
        ));
    }

    let other = match (x, y) {
        (UNIPROT, other) | (other, UNIPROT) if other != UNIPROT => other,
        _ => return None,
    };
    let info = id_types::info(other)?;

    if info.uniprot_field.is_some() {
        Some(Resource::new(MappingInput::Uniprot {
            id_type: other.to_string(),
            swissprot: Some(true),
        }))
    } else if info.idmapping_db.is_some() {
        Some(Resource::new(MappingInput::UniprotList {
            id_type_a: UNIPROT.to_string(),
            id_type_b: other.to_string(),
            uniprots: None,
        }))
    } else {
        None
    }
}

/// Backend families able to serve this pair, in the order they should be tried
pub fn implicit(id_type: &str, target_id_type: &str, ncbi_tax_id: u32) -> Vec<Resource> {
    let mut resources = Vec::new();
    let (Some(x), Some(y)) = (id_types::info(id_type), id_types::info(target_id_type)) else {
        return resources;
    };

    // Protein Ontology
    for (pro, other) in [(x, y), (y, x)] {
        if pro.name == PRO && other.pro_prefix.is_some() {
            resources.push(Resource::new(MappingInput::Pro {
                id_type: other.name.to_string(),
            }));
        }
    }

    if x.biomart_attr.is_some() && y.biomart_attr.is_some() {
        resources.push(Resource::new(MappingInput::Biomart {
            id_type_a: x.name.to_string(),
            id_type_b: y.name.to_string(),
        }));
    }

    // microarray probes of one vendor against an Ensembl attribute
    for (probe, other) in [(x, y), (y, x)] {
        let has_arrays = organism::by_tax_id(ncbi_tax_id)
            .is_some_and(|o| !o.array_attributes(probe.name).is_empty());
        if id_types::is_probe(probe.name) && other.biomart_attr.is_some() && has_arrays {
            resources.push(Resource::new(MappingInput::Array {
                vendor: probe.name.to_string(),
                id_type: other.name.to_string(),
            }));
        }
    }

    if x.unichem_src.is_some() && y.unichem_src.is_some() {
        resources.push(Resource::new(MappingInput::Unichem {
            id_type_a: x.name.to_string(),
            id_type_b: y.name.to_string(),
        }));
    }
    if x.ramp_type.is_some() && y.ramp_type.is_some() {
        resources.push(Resource::new(MappingInput::Ramp {
            id_type_a: x.name.to_string(),
            id_type_b: y.name.to_string(),
        }));
    }
    if x.hmdb_field.is_some() && y.hmdb_field.is_some() {
        resources.push(Resource::new(MappingInput::Hmdb {
            id_type_a: x.name.to_string(),
            id_type_b: y.name.to_string(),
        }));
    }

    resources
}

/// Both sides are columns of UniProt's `idmapping_selected.tab`
pub fn uniprot_static_eligible(id_type: &str, target_id_type: &str) -> bool {
    let col = |t: &str| id_types::info(t).and_then(|i| i.uniprot_static_col);
    id_type != target_id_type && col(id_type).is_some() && col(target_id_type).is_some()
}

/// The per-organism `idmapping_selected.tab.gz` as a file resource
pub fn uniprot_static(
    id_type: &str,
    target_id_type: &str,
    ncbi_tax_id: u32,
    config: &MapperConfig,
) -> Option<Resource> {
    let col_a = id_types::info(id_type)?.uniprot_static_col?;
    let col_b = id_types::info(target_id_type)?.uniprot_static_col?;
    let organism = organism::by_tax_id(ncbi_tax_id)?;

    let url = format!(
        "{}/idmapping/by_organism/{}_idmapping_selected.tab.gz",
        config.endpoints.uniprot_ftp, organism.uniprot_mnemonic
    );
    Some(Resource::new(MappingInput::File(
        FileInput::new(id_type, target_id_type, FileSource::Url(url), col_a, col_b).separator2("; "),
    )))
}
