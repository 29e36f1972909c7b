//! idmap Mapping Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Translates names between identifier systems of molecular biology: gene
//! symbols, UniProt accessions, Ensembl, Entrez, RefSeq, microarray probes,
//! miRNA names and small-molecule databases.
//!
//! # Overview
//!
//! - **Tables** ([`MappingTable`]): one-directional name -> names dictionaries
//!   keyed by ([`MappingTableKey`]) ID type pair and organism
//! - **Readers** ([`reader::MapReader`]): build tables from files, the UniProt
//!   REST API, the UniProt ID mapping service, BioMart, PRO, UniChem, RaMP,
//!   HMDB and generated sources, with a disk cache in front
//! - **Mapper** ([`Mapper`]): owns the loaded tables, runs the fallback
//!   cascade, cleans UniProt results and evicts idle tables in the background
//!
//! A translation that finds nothing is an empty set, never an error.
//!
//! # Example
//!
//! ```no_run
//! use idmap_mapping::{MapOptions, Mapper, MapperConfig};
//!
//! fn main() -> idmap_mapping::Result<()> {
//!     let mapper = Mapper::new(MapperConfig::from_env()?)?;
//!
//!     let uniprots = mapper.map_name("TP53", "genesymbol", "uniprot")?;
//!     println!("{:?}", uniprots);
//!
//!     let mouse = MapOptions::default().organism(10090);
//!     let first = mapper.map_name0("Trp53", "genesymbol", "uniprot", &mouse)?;
//!     println!("{:?}", first);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod id_types;
pub mod input;
pub mod key;
pub mod mapper;
pub mod organism;
pub mod reader;
pub mod reference;
pub mod registry;
pub mod resources;
pub mod sweeper;
pub mod table;
pub mod uniprot;

// Re-export commonly used types
pub use config::MapperConfig;
pub use error::{MappingError, Result};
pub use http::{Fetcher, HttpFetcher, MockFetcher};
pub use key::MappingTableKey;
pub use mapper::{MapOptions, Mapper, MapperBuilder, MemoStats};
pub use reference::ReferenceKind;
pub use table::{MappingData, MappingTable};
pub use uniprot::only_uniprot_ac;
