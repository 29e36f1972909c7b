//! Build automation tasks for idmap
//!
//! Currently generates the CLI reference from the clap definitions.

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for idmap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<idmap_cli::Cli>();

    let content = format!(
        r#"# idmap CLI Reference

This documentation is generated from the CLI source code. Last updated: {}.

## Overview

idmap translates identifiers between biological databases (UniProt, Entrez,
Ensembl, gene symbols, RefSeq, small molecule registries, ...). Tables are
downloaded on first use and cached on disk.

## Installation

```bash
cargo install --path crates/idmap-cli
```

## Quick Start

```bash
# Gene symbols to UniProt accessions (human by default)
idmap translate --from genesymbol --to uniprot TP53 BRCA1

# Mouse, one translation per name, from stdin
cat symbols.txt | idmap -o mouse translate -f genesymbol -t uniprot --first

# Export a whole table as JSON
idmap table -f uniprot -t entrez --format json --output uniprot_entrez.json

# Supported ID types
idmap id-types --entity protein
```

## Environment Variables

- `IDMAP_CONFIG` - TOML configuration file
- `IDMAP_ORGANISM` - Default organism (taxonomy ID or name)
- `IDMAP_CACHE_DIR` - Cache directory for downloaded tables
- `IDMAP_TABLE_LIFETIME_SECS` - Idle time before a loaded table is evicted
- `IDMAP_UNIPROT_REST_URL`, `IDMAP_UNIPROT_FTP_URL`, `IDMAP_BIOMART_URL` - Service endpoints
- `LOG_LEVEL` - Logging level (`trace`, `debug`, `info`, `warn`, `error`)

---

{}
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("✓ CLI documentation generated: {}", file_path.display());

    Ok(())
}
