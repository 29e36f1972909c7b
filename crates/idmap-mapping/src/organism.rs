//! Organisms known to the mapping backends

use serde::Serialize;

/// Taxonomy ID used for ID systems that are not organism specific (e.g. compounds)
pub const NOT_ORGANISM_SPECIFIC: u32 = 0;

pub const DEFAULT_NCBI_TAX_ID: u32 = 9606;

/// Microarray platform attributes for one vendor, as named in BioMart
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ArrayPlatforms {
    pub vendor: &'static str,
    pub attributes: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Organism {
    pub ncbi_tax_id: u32,
    pub latin_name: &'static str,
    pub common_name: &'static str,
    /// Suffix of the per-organism file under `idmapping/by_organism/`
    pub uniprot_mnemonic: &'static str,
    /// Prefix of the `<prefix>_gene_ensembl` BioMart dataset
    pub ensembl_prefix: &'static str,
    /// Three-letter code prefixing miRBase names (`hsa-miR-21-5p`)
    pub mirbase_code: &'static str,
    pub arrays: &'static [ArrayPlatforms],
}

impl Organism {
    pub fn biomart_dataset(&self) -> String {
        format!("{}_gene_ensembl", self.ensembl_prefix)
    }

    pub fn array_attributes(&self, vendor: &str) -> &'static [&'static str] {
        self.arrays
            .iter()
            .find(|a| a.vendor == vendor)
            .map(|a| a.attributes)
            .unwrap_or(&[])
    }
}

static ORGANISMS: &[Organism] = &[
    Organism {
        ncbi_tax_id: 9606,
        latin_name: "Homo sapiens",
        common_name: "human",
        uniprot_mnemonic: "HUMAN_9606",
        ensembl_prefix: "hsapiens",
        mirbase_code: "hsa",
        arrays: &[
            ArrayPlatforms {
                vendor: "affy",
                attributes: &[
                    "affy_hg_u133_plus_2",
                    "affy_hg_u133a",
                    "affy_hg_u133a_2",
                    "affy_hg_u95av2",
                    "affy_hugene_1_0_st_v1",
                    "affy_hugene_2_0_st_v1",
                ],
            },
            ArrayPlatforms {
                vendor: "illumina",
                attributes: &["illumina_humanht_12_v3", "illumina_humanht_12_v4", "illumina_humanwg_6_v3"],
            },
            ArrayPlatforms {
                vendor: "agilent",
                attributes: &["agilent_sureprint_g3_ge_8x60k", "agilent_wholegenome_4x44k_v2"],
            },
        ],
    },
    Organism {
        ncbi_tax_id: 10090,
        latin_name: "Mus musculus",
        common_name: "mouse",
        uniprot_mnemonic: "MOUSE_10090",
        ensembl_prefix: "mmusculus",
        mirbase_code: "mmu",
        arrays: &[
            ArrayPlatforms {
                vendor: "affy",
                attributes: &["affy_mouse430_2", "affy_mouse430a_2", "affy_mogene_1_0_st_v1"],
            },
            ArrayPlatforms {
                vendor: "illumina",
                attributes: &["illumina_mouseref_8", "illumina_mousewg_6_v2"],
            },
            ArrayPlatforms {
                vendor: "agilent",
                attributes: &["agilent_sureprint_g3_ge_8x60k", "agilent_wholegenome_4x44k_v2"],
            },
        ],
    },
    Organism {
        ncbi_tax_id: 10116,
        latin_name: "Rattus norvegicus",
        common_name: "rat",
        uniprot_mnemonic: "RAT_10116",
        ensembl_prefix: "rnorvegicus",
        mirbase_code: "rno",
        arrays: &[
            ArrayPlatforms {
                vendor: "affy",
                attributes: &["affy_rat230_2", "affy_ragene_1_0_st_v1"],
            },
            ArrayPlatforms {
                vendor: "agilent",
                attributes: &["agilent_wholegenome_4x44k_v3"],
            },
        ],
    },
    Organism {
        ncbi_tax_id: 7955,
        latin_name: "Danio rerio",
        common_name: "zebrafish",
        uniprot_mnemonic: "DANRE_7955",
        ensembl_prefix: "drerio",
        mirbase_code: "dre",
        arrays: &[ArrayPlatforms {
            vendor: "affy",
            attributes: &["affy_zebrafish"],
        }],
    },
    Organism {
        ncbi_tax_id: 7227,
        latin_name: "Drosophila melanogaster",
        common_name: "fruit fly",
        uniprot_mnemonic: "DROME_7227",
        ensembl_prefix: "dmelanogaster",
        mirbase_code: "dme",
        arrays: &[ArrayPlatforms {
            vendor: "affy",
            attributes: &["affy_drosophila_2"],
        }],
    },
    Organism {
        ncbi_tax_id: 6239,
        latin_name: "Caenorhabditis elegans",
        common_name: "nematode",
        uniprot_mnemonic: "CAEEL_6239",
        ensembl_prefix: "celegans",
        mirbase_code: "cel",
        arrays: &[ArrayPlatforms {
            vendor: "affy",
            attributes: &["affy_c_elegans"],
        }],
    },
    Organism {
        ncbi_tax_id: 9031,
        latin_name: "Gallus gallus",
        common_name: "chicken",
        uniprot_mnemonic: "CHICK_9031",
        ensembl_prefix: "ggallus",
        mirbase_code: "gga",
        arrays: &[ArrayPlatforms {
            vendor: "affy",
            attributes: &["affy_chicken"],
        }],
    },
    Organism {
        ncbi_tax_id: 9913,
        latin_name: "Bos taurus",
        common_name: "cattle",
        uniprot_mnemonic: "BOVIN_9913",
        ensembl_prefix: "btaurus",
        mirbase_code: "bta",
        arrays: &[ArrayPlatforms {
            vendor: "affy",
            attributes: &["affy_bovine"],
        }],
    },
    Organism {
        ncbi_tax_id: 9823,
        latin_name: "Sus scrofa",
        common_name: "pig",
        uniprot_mnemonic: "PIG_9823",
        ensembl_prefix: "sscrofa",
        mirbase_code: "ssc",
        arrays: &[ArrayPlatforms {
            vendor: "affy",
            attributes: &["affy_porcine"],
        }],
    },
    Organism {
        ncbi_tax_id: 559292,
        latin_name: "Saccharomyces cerevisiae",
        common_name: "yeast",
        uniprot_mnemonic: "YEAST_559292",
        ensembl_prefix: "scerevisiae",
        mirbase_code: "sce",
        arrays: &[ArrayPlatforms {
            vendor: "affy",
            attributes: &["affy_yeast_2"],
        }],
    },
];

pub fn all() -> &'static [Organism] {
    ORGANISMS
}

pub fn by_tax_id(ncbi_tax_id: u32) -> Option<&'static Organism> {
    ORGANISMS.iter().find(|o| o.ncbi_tax_id == ncbi_tax_id)
}

/// Resolve a taxonomy ID, latin name, common name, Ensembl prefix or miRBase code
pub fn resolve(query: &str) -> Option<u32> {
    let query = query.trim();
    if let Ok(tax_id) = query.parse::<u32>() {
        return Some(tax_id);
    }
    ORGANISMS
        .iter()
        .find(|o| {
            o.latin_name.eq_ignore_ascii_case(query)
                || o.common_name.eq_ignore_ascii_case(query)
                || o.ensembl_prefix.eq_ignore_ascii_case(query)
                || o.mirbase_code.eq_ignore_ascii_case(query)
        })
        .map(|o| o.ncbi_tax_id)
}
