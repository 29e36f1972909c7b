//! idmap CLI Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Command-line front end for translating biological identifiers.
//!
//! # Overview
//!
//! - **Translation**: map names between ID types (`idmap translate`)
//! - **Bulk export**: dump a whole translation table (`idmap table`)
//! - **Discovery**: list supported ID types and their backends (`idmap id-types`)
//! - **Cache Management**: inspect and clean the table cache (`idmap cache`)
//! - **Configuration**: show the effective settings (`idmap config show`)

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// idmap - translate identifiers between biological databases
#[derive(Parser, Debug)]
#[command(name = "idmap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Organism: NCBI taxonomy ID or name (defaults to the configured organism)
    #[arg(short, long, env = "IDMAP_ORGANISM", global = true)]
    pub organism: Option<String>,

    /// Cache directory for downloaded tables
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, env = "IDMAP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Print the CLI reference as Markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate names from one ID type to another
    Translate {
        /// Source ID type (e.g. genesymbol, uniprot, entrez)
        #[arg(short = 'f', long = "from")]
        id_type: String,

        /// Target ID type
        #[arg(short = 't', long = "to")]
        target_id_type: String,

        /// Names to translate; read from stdin, one per line, when omitted
        names: Vec<String>,

        /// Skip the lossy fallbacks (synonyms stay, suffix and prefix guesses go)
        #[arg(long)]
        strict: bool,

        /// Return UniProt results without secondary/TrEMBL/proteome cleanup
        #[arg(long)]
        no_cleanup: bool,

        /// Keep COMPLEX:... names instead of translating their components
        #[arg(long)]
        keep_complexes: bool,

        /// Print at most one translation per name
        #[arg(long)]
        first: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
        format: OutputFormat,
    },

    /// Export a whole translation table
    Table {
        /// Source ID type
        #[arg(short = 'f', long = "from")]
        id_type: String,

        /// Target ID type
        #[arg(short = 't', long = "to")]
        target_id_type: String,

        /// Output file (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
        format: OutputFormat,
    },

    /// List the supported ID types
    IdTypes {
        /// Only types of this entity kind (protein, gene, transcript, mirna, small molecule, probe)
        #[arg(long)]
        entity: Option<String>,
    },

    /// Manage the table cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// List cached tables
    List,

    /// Remove cached tables
    Clean {
        /// Remove every cached table
        #[arg(short, long)]
        all: bool,

        /// Remove tables not rewritten for this many days
        #[arg(long)]
        older_than_days: Option<u64>,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Bordered table
    Table,
    /// Tab-separated, one pair per line
    Tsv,
    /// JSON object of name -> sorted translations
    Json,
}
