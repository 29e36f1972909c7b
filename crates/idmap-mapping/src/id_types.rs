//! Registry of identifier types
//!
//! Each ID type is a short canonical name (`uniprot`, `genesymbol`, `ensg`, ...)
//! plus the vocabulary each backend uses for it. Backends look up their own
//! column/field/attribute here instead of hard-coding per-type strings.

use serde::Serialize;

pub const UNIPROT: &str = "uniprot";
pub const UNIPROT_SEC: &str = "uniprot-sec";
pub const UNIPROT_PRI: &str = "uniprot-pri";
pub const TREMBL: &str = "trembl";
pub const SWISSPROT: &str = "swissprot";
pub const UNIPROT_ENTRY: &str = "uniprot-entry";
pub const GENESYMBOL: &str = "genesymbol";
pub const GENESYMBOL_SYN: &str = "genesymbol-syn";
pub const GENESYMBOL5: &str = "genesymbol5";
pub const PROTEIN_NAME: &str = "protein-name";
pub const ENTREZ: &str = "entrez";
pub const HGNC: &str = "hgnc";
pub const MGI: &str = "mgi";
pub const RGD: &str = "rgd";
pub const EMBL: &str = "embl";
pub const EMBL_ID: &str = "embl_id";
pub const PDB: &str = "pdb";
pub const REFSEQP: &str = "refseqp";
pub const REFSEQN: &str = "refseqn";
pub const ENSG: &str = "ensg";
pub const ENST: &str = "enst";
pub const ENSP: &str = "ensp";
pub const ENSP_BIOMART: &str = "ensp_biomart";
pub const STRING: &str = "string";
pub const CHEMBL: &str = "chembl";
pub const DRUGBANK: &str = "drugbank";
pub const PRO: &str = "pro";
pub const MIR_PRE: &str = "mir-pre";
pub const MIR_NAME: &str = "mir-name";
pub const MIR_MAT_NAME: &str = "mir-mat-name";
pub const MIRBASE: &str = "mirbase";
pub const AFFY: &str = "affy";
pub const ILLUMINA: &str = "illumina";
pub const AGILENT: &str = "agilent";
pub const PUBCHEM: &str = "pubchem";
pub const CHEBI: &str = "chebi";
pub const HMDB: &str = "hmdb";
pub const KEGG: &str = "kegg";
pub const LIPIDMAPS: &str = "lipidmaps";
pub const SWISSLIPIDS: &str = "swisslipids";
pub const ZINC: &str = "zinc";
pub const IUPHAR: &str = "iuphar";
pub const CAS: &str = "cas";
pub const INCHIKEY: &str = "inchikey";
pub const COMPLEX: &str = "complex";

/// What kind of entity an identifier denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Protein,
    Gene,
    Transcript,
    Mirna,
    SmallMolecule,
    Probe,
    Complex,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Protein => "protein",
            EntityKind::Gene => "gene",
            EntityKind::Transcript => "transcript",
            EntityKind::Mirna => "mirna",
            EntityKind::SmallMolecule => "small molecule",
            EntityKind::Probe => "probe",
            EntityKind::Complex => "complex",
        };
        f.write_str(name)
    }
}

/// Description of one ID type and how each backend refers to it
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IdTypeInfo {
    pub name: &'static str,
    pub label: &'static str,
    pub entity: EntityKind,
    /// Return field of the UniProt REST search endpoint
    pub uniprot_field: Option<&'static str>,
    /// Database name in the UniProt ID mapping service (UniProt itself is
    /// `UniProtKB_AC-ID` as a source and `UniProtKB` as a target)
    pub idmapping_db: Option<&'static str>,
    /// Ensembl BioMart attribute
    pub biomart_attr: Option<&'static str>,
    /// Zero-based column in `idmapping_selected.tab`
    pub uniprot_static_col: Option<usize>,
    /// UniChem source number
    pub unichem_src: Option<u32>,
    /// `IDtype` value in the RaMP source table
    pub ramp_type: Option<&'static str>,
    /// Element name inside an HMDB `<metabolite>` record
    pub hmdb_field: Option<&'static str>,
    /// Prefix used in the Protein Ontology mapping file
    pub pro_prefix: Option<&'static str>,
}

const fn base(name: &'static str, label: &'static str, entity: EntityKind) -> IdTypeInfo {
    IdTypeInfo {
        name,
        label,
        entity,
        uniprot_field: None,
        idmapping_db: None,
        biomart_attr: None,
        uniprot_static_col: None,
        unichem_src: None,
        ramp_type: None,
        hmdb_field: None,
        pro_prefix: None,
    }
}

use EntityKind::*;

static ID_TYPES: &[IdTypeInfo] = &[
    IdTypeInfo {
        uniprot_field: Some("accession"),
        idmapping_db: Some("UniProtKB"),
        uniprot_static_col: Some(0),
        ramp_type: Some("uniprot"),
        pro_prefix: Some("UniProtKB"),
        ..base(UNIPROT, "UniProt", Protein)
    },
    base(UNIPROT_SEC, "UniProt secondary", Protein),
    base(UNIPROT_PRI, "UniProt primary", Protein),
    base(TREMBL, "TrEMBL", Protein),
    base(SWISSPROT, "SwissProt", Protein),
    IdTypeInfo {
        uniprot_field: Some("id"),
        uniprot_static_col: Some(1),
        ..base(UNIPROT_ENTRY, "UniProt entry name", Protein)
    },
    IdTypeInfo {
        uniprot_field: Some("gene_primary"),
        idmapping_db: Some("Gene_Name"),
        ramp_type: Some("gene_symbol"),
        ..base(GENESYMBOL, "Gene Symbol", Gene)
    },
    IdTypeInfo {
        uniprot_field: Some("gene_synonym"),
        ..base(GENESYMBOL_SYN, "Gene Symbol synonym", Gene)
    },
    base(GENESYMBOL5, "Gene Symbol 5-prefix", Gene),
    IdTypeInfo {
        uniprot_field: Some("protein_name"),
        ..base(PROTEIN_NAME, "Protein name", Protein)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_geneid"),
        idmapping_db: Some("GeneID"),
        uniprot_static_col: Some(2),
        ramp_type: Some("entrez"),
        pro_prefix: Some("NCBIGene"),
        ..base(ENTREZ, "Entrez Gene", Gene)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_hgnc"),
        idmapping_db: Some("HGNC"),
        pro_prefix: Some("HGNC"),
        ..base(HGNC, "HGNC", Gene)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_mgi"),
        idmapping_db: Some("MGI"),
        pro_prefix: Some("MGI"),
        ..base(MGI, "MGI", Gene)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_rgd"),
        idmapping_db: Some("RGD"),
        pro_prefix: Some("RGD"),
        ..base(RGD, "RGD", Gene)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_embl"),
        idmapping_db: Some("EMBL-GenBank-DDBJ"),
        uniprot_static_col: Some(16),
        ..base(EMBL, "EMBL", Transcript)
    },
    IdTypeInfo {
        idmapping_db: Some("EMBL-GenBank-DDBJ_CDS"),
        uniprot_static_col: Some(17),
        ..base(EMBL_ID, "EMBL CDS", Protein)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_pdb"),
        idmapping_db: Some("PDB"),
        uniprot_static_col: Some(5),
        unichem_src: Some(3),
        ..base(PDB, "PDB", Protein)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_refseq"),
        idmapping_db: Some("RefSeq_Protein"),
        uniprot_static_col: Some(3),
        ..base(REFSEQP, "RefSeq protein", Protein)
    },
    IdTypeInfo {
        idmapping_db: Some("RefSeq_Nucleotide"),
        ..base(REFSEQN, "RefSeq nucleotide", Transcript)
    },
    IdTypeInfo {
        idmapping_db: Some("Ensembl"),
        biomart_attr: Some("ensembl_gene_id"),
        uniprot_static_col: Some(18),
        ramp_type: Some("ensembl"),
        ..base(ENSG, "Ensembl gene", Gene)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_ensembl"),
        idmapping_db: Some("Ensembl_Transcript"),
        biomart_attr: Some("ensembl_transcript_id"),
        uniprot_static_col: Some(19),
        ..base(ENST, "Ensembl transcript", Transcript)
    },
    IdTypeInfo {
        idmapping_db: Some("Ensembl_Protein"),
        uniprot_static_col: Some(20),
        ..base(ENSP, "Ensembl protein", Protein)
    },
    IdTypeInfo {
        biomart_attr: Some("ensembl_peptide_id"),
        ..base(ENSP_BIOMART, "Ensembl protein (BioMart)", Protein)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_string"),
        idmapping_db: Some("STRING"),
        ..base(STRING, "STRING", Protein)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_chembl"),
        idmapping_db: Some("ChEMBL"),
        unichem_src: Some(1),
        ..base(CHEMBL, "ChEMBL", SmallMolecule)
    },
    IdTypeInfo {
        uniprot_field: Some("xref_drugbank"),
        idmapping_db: Some("DrugBank"),
        unichem_src: Some(2),
        hmdb_field: Some("drugbank_id"),
        ..base(DRUGBANK, "DrugBank", SmallMolecule)
    },
    base(PRO, "Protein Ontology", Protein),
    base(MIR_PRE, "miRBase precursor accession", Mirna),
    base(MIR_NAME, "miRNA precursor name", Mirna),
    base(MIR_MAT_NAME, "Mature miRNA name", Mirna),
    base(MIRBASE, "miRBase mature accession", Mirna),
    base(AFFY, "Affymetrix probe", Probe),
    base(ILLUMINA, "Illumina probe", Probe),
    base(AGILENT, "Agilent probe", Probe),
    IdTypeInfo {
        unichem_src: Some(22),
        ramp_type: Some("pubchem"),
        hmdb_field: Some("pubchem_compound_id"),
        ..base(PUBCHEM, "PubChem CID", SmallMolecule)
    },
    IdTypeInfo {
        unichem_src: Some(7),
        ramp_type: Some("chebi"),
        hmdb_field: Some("chebi_id"),
        ..base(CHEBI, "ChEBI", SmallMolecule)
    },
    IdTypeInfo {
        unichem_src: Some(18),
        ramp_type: Some("hmdb"),
        hmdb_field: Some("accession"),
        ..base(HMDB, "HMDB", SmallMolecule)
    },
    IdTypeInfo {
        unichem_src: Some(6),
        ramp_type: Some("kegg"),
        hmdb_field: Some("kegg_id"),
        ..base(KEGG, "KEGG compound", SmallMolecule)
    },
    IdTypeInfo {
        unichem_src: Some(33),
        ramp_type: Some("LIPIDMAPS"),
        ..base(LIPIDMAPS, "LIPID MAPS", SmallMolecule)
    },
    IdTypeInfo {
        unichem_src: Some(41),
        ramp_type: Some("swisslipids"),
        ..base(SWISSLIPIDS, "SwissLipids", SmallMolecule)
    },
    IdTypeInfo {
        unichem_src: Some(9),
        ..base(ZINC, "ZINC", SmallMolecule)
    },
    IdTypeInfo {
        unichem_src: Some(4),
        ..base(IUPHAR, "IUPHAR/BPS Guide to Pharmacology", SmallMolecule)
    },
    IdTypeInfo {
        ramp_type: Some("CAS"),
        hmdb_field: Some("cas_registry_number"),
        ..base(CAS, "CAS registry number", SmallMolecule)
    },
    IdTypeInfo {
        hmdb_field: Some("inchikey"),
        ..base(INCHIKEY, "InChIKey", SmallMolecule)
    },
    base(COMPLEX, "Complex", Complex),
];

/// All registered ID types, in registry order
pub fn all() -> &'static [IdTypeInfo] {
    ID_TYPES
}

pub fn info(name: &str) -> Option<&'static IdTypeInfo> {
    ID_TYPES.iter().find(|t| t.name == name)
}

pub fn label(name: &str) -> &str {
    info(name).map(|t| t.label).unwrap_or(name)
}

/// Resolve a canonical name or a human label, ignoring case
pub fn resolve(name_or_label: &str) -> Option<&'static str> {
    let needle = name_or_label.trim();
    ID_TYPES
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(needle) || t.label.eq_ignore_ascii_case(needle))
        .map(|t| t.name)
}

pub fn is_uniprot_like(id_type: &str) -> bool {
    matches!(id_type, UNIPROT | UNIPROT_SEC | UNIPROT_PRI | TREMBL | SWISSPROT)
}

pub fn is_ensembl(id_type: &str) -> bool {
    matches!(id_type, ENSG | ENST | ENSP | ENSP_BIOMART)
}

pub fn is_refseq(id_type: &str) -> bool {
    matches!(id_type, REFSEQP | REFSEQN)
}

pub fn is_probe(id_type: &str) -> bool {
    info(id_type).is_some_and(|t| t.entity == EntityKind::Probe)
}

pub fn is_mirna_name(id_type: &str) -> bool {
    matches!(id_type, MIR_NAME | MIR_MAT_NAME)
}

pub fn is_small_molecule(id_type: &str) -> bool {
    info(id_type).is_some_and(|t| t.entity == EntityKind::SmallMolecule)
}
