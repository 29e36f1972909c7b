//! Mapping input definitions
//!
//! A [`MappingInput`] says where a table comes from. It is a closed set of
//! backend kinds; [`crate::reader::MapReader`] dispatches on the variant.

use crate::error::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Bumped whenever the parameters hashed into a cache file name change meaning
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// The parameters that define a table, hashed to name its cache file
pub type CacheParams = BTreeMap<String, String>;

/// Rows produced by a programmatic source, given the organism
pub type RowGenerator = Arc<dyn Fn(u32) -> Result<Vec<Vec<String>>> + Send + Sync>;

/// Built-in programmatic tables
#[derive(Clone)]
pub enum GeneratedTable {
    /// `mature.fa` headers: mature name, MIMAT accession
    MirbaseMature,
    /// `hairpin.fa` headers: precursor name, MI accession
    MirbaseHairpin,
    /// `sec_ac.txt`: secondary accession, primary accession
    UniprotSecondary,
    Custom { name: String, generate: RowGenerator },
}

impl GeneratedTable {
    pub fn name(&self) -> &str {
        match self {
            GeneratedTable::MirbaseMature => "mirbase_mature",
            GeneratedTable::MirbaseHairpin => "mirbase_hairpin",
            GeneratedTable::UniprotSecondary => "uniprot_secondary",
            GeneratedTable::Custom { name, .. } => name.as_str(),
        }
    }
}

impl fmt::Debug for GeneratedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeneratedTable({})", self.name())
    }
}

#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Url(String),
    Generated(GeneratedTable),
}

impl FileSource {
    fn describe(&self) -> String {
        match self {
            FileSource::Path(path) => format!("path:{}", path.display()),
            FileSource::Url(url) => format!("url:{}", url),
            FileSource::Generated(table) => format!("generated:{}", table.name()),
        }
    }
}

/// A delimited file, local, remote or generated
#[derive(Debug, Clone)]
pub struct FileInput {
    pub id_type_a: String,
    pub id_type_b: String,
    pub source: FileSource,
    pub col_a: usize,
    pub col_b: usize,
    /// `None` splits on any run of whitespace
    pub separator: Option<String>,
    /// Splits multi-valued cells in either column
    pub separator2: Option<String>,
    /// Leading lines to skip
    pub header: usize,
}

impl FileInput {
    pub fn new(
        id_type_a: impl Into<String>,
        id_type_b: impl Into<String>,
        source: FileSource,
        col_a: usize,
        col_b: usize,
    ) -> Self {
        Self {
            id_type_a: id_type_a.into(),
            id_type_b: id_type_b.into(),
            source,
            col_a,
            col_b,
            separator: Some("\t".to_string()),
            separator2: None,
            header: 0,
        }
    }

    pub fn separator(mut self, separator: Option<&str>) -> Self {
        self.separator = separator.map(str::to_string);
        self
    }

    pub fn separator2(mut self, separator2: &str) -> Self {
        self.separator2 = Some(separator2.to_string());
        self
    }

    pub fn header(mut self, lines: usize) -> Self {
        self.header = lines;
        self
    }
}

#[derive(Debug, Clone)]
pub enum MappingInput {
    File(FileInput),
    /// UniProt REST query: side A is always `uniprot`, side B is `id_type`
    Uniprot {
        id_type: String,
        /// `Some(true)` SwissProt only, `Some(false)` TrEMBL only, `None` both
        swissprot: Option<bool>,
    },
    /// UniProt ID mapping service jobs
    UniprotList {
        id_type_a: String,
        id_type_b: String,
        /// Upload list; the organism's reference proteome when absent
        uniprots: Option<Vec<String>>,
    },
    /// Protein Ontology: side A is always `pro`
    Pro { id_type: String },
    Biomart { id_type_a: String, id_type_b: String },
    /// Microarray probes of one vendor (side A) against an Ensembl ID type
    Array { vendor: String, id_type: String },
    Unichem { id_type_a: String, id_type_b: String },
    Ramp { id_type_a: String, id_type_b: String },
    Hmdb { id_type_a: String, id_type_b: String },
}

impl MappingInput {
    pub fn backend(&self) -> &'static str {
        match self {
            MappingInput::File(_) => "file",
            MappingInput::Uniprot { .. } => "uniprot",
            MappingInput::UniprotList { .. } => "uniprot_list",
            MappingInput::Pro { .. } => "pro",
            MappingInput::Biomart { .. } => "biomart",
            MappingInput::Array { .. } => "array",
            MappingInput::Unichem { .. } => "unichem",
            MappingInput::Ramp { .. } => "ramp",
            MappingInput::Hmdb { .. } => "hmdb",
        }
    }

    pub fn id_type_a(&self) -> &str {
        match self {
            MappingInput::File(input) => input.id_type_a.as_str(),
            MappingInput::Uniprot { .. } => crate::id_types::UNIPROT,
            MappingInput::Pro { .. } => crate::id_types::PRO,
            MappingInput::Array { vendor, .. } => vendor.as_str(),
            MappingInput::UniprotList { id_type_a, .. }
            | MappingInput::Biomart { id_type_a, .. }
            | MappingInput::Unichem { id_type_a, .. }
            | MappingInput::Ramp { id_type_a, .. }
            | MappingInput::Hmdb { id_type_a, .. } => id_type_a.as_str(),
        }
    }

    pub fn id_type_b(&self) -> &str {
        match self {
            MappingInput::File(input) => input.id_type_b.as_str(),
            MappingInput::Uniprot { id_type, .. }
            | MappingInput::Pro { id_type }
            | MappingInput::Array { id_type, .. } => id_type.as_str(),
            MappingInput::UniprotList { id_type_b, .. }
            | MappingInput::Biomart { id_type_b, .. }
            | MappingInput::Unichem { id_type_b, .. }
            | MappingInput::Ramp { id_type_b, .. }
            | MappingInput::Hmdb { id_type_b, .. } => id_type_b.as_str(),
        }
    }

    /// Whether tables from this input are scoped to one organism
    pub fn organism_specific(&self) -> bool {
        match self {
            MappingInput::Pro { .. }
            | MappingInput::Unichem { .. }
            | MappingInput::Ramp { .. }
            | MappingInput::Hmdb { .. } => false,
            MappingInput::File(FileInput {
                source: FileSource::Generated(GeneratedTable::UniprotSecondary),
                ..
            }) => false,
            _ => true,
        }
    }

    /// The explicit, versioned parameter set that names this input's cache files
    pub fn cache_params(&self, ncbi_tax_id: u32) -> CacheParams {
        let mut params = CacheParams::new();
        params.insert("schema".to_string(), CACHE_SCHEMA_VERSION.to_string());
        params.insert("backend".to_string(), self.backend().to_string());
        params.insert("id_type_a".to_string(), self.id_type_a().to_string());
        params.insert("id_type_b".to_string(), self.id_type_b().to_string());
        params.insert("ncbi_tax_id".to_string(), ncbi_tax_id.to_string());

        match self {
            MappingInput::File(input) => {
                params.insert("source".to_string(), input.source.describe());
                params.insert("col_a".to_string(), input.col_a.to_string());
                params.insert("col_b".to_string(), input.col_b.to_string());
                params.insert(
                    "separator".to_string(),
                    input.separator.clone().unwrap_or_else(|| "<whitespace>".to_string()),
                );
                if let Some(ref separator2) = input.separator2 {
                    params.insert("separator2".to_string(), separator2.clone());
                }
                params.insert("header".to_string(), input.header.to_string());
            },
            MappingInput::Uniprot { swissprot, .. } => {
                let reviewed = match swissprot {
                    Some(true) => "true",
                    Some(false) => "false",
                    None => "any",
                };
                params.insert("reviewed".to_string(), reviewed.to_string());
            },
            MappingInput::UniprotList { uniprots, .. } => {
                let upload = match uniprots {
                    Some(ids) => {
                        let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
                        sorted.sort_unstable();
                        idmap_common::checksum::compute_bytes_checksum(
                            sorted.join(",").as_bytes(),
                            idmap_common::checksum::ChecksumAlgorithm::Md5,
                        )
                    },
                    None => "reference".to_string(),
                };
                params.insert("upload".to_string(), upload);
            },
            MappingInput::Array { vendor, .. } => {
                params.insert("vendor".to_string(), vendor.clone());
            },
            MappingInput::Pro { .. }
            | MappingInput::Biomart { .. }
            | MappingInput::Unichem { .. }
            | MappingInput::Ramp { .. }
            | MappingInput::Hmdb { .. } => {},
        }

        params
    }
}
