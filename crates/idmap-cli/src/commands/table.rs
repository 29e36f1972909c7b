//! `idmap table` command implementation
//!
//! Dumps a whole translation table, loading it first if needed.

use crate::config::resolve_id_type;
use crate::error::{CliError, Result};
use crate::output::{render, Translations};
use crate::OutputFormat;
use colored::Colorize;
use idmap_mapping::{MapperConfig, MappingTable};
use std::path::PathBuf;

pub fn run(
    config: MapperConfig,
    id_type: String,
    target_id_type: String,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let id_type = resolve_id_type(&id_type)?;
    let target_id_type = resolve_id_type(&target_id_type)?;
    let ncbi_tax_id = config.default_ncbi_tax_id;

    let mapper = super::mapper(config)?;
    let table = mapper
        .translation_dict(id_type, target_id_type, Some(ncbi_tax_id))?
        .ok_or_else(|| CliError::NoTable {
            id_type: id_type.to_string(),
            target_id_type: target_id_type.to_string(),
            ncbi_tax_id,
        })?;

    let formatted = render(&to_translations(&table), id_type, target_id_type, format)?;
    match output {
        Some(path) => {
            std::fs::write(&path, formatted)?;
            eprintln!(
                "{} {} entries written to {}",
                "✓".green(),
                table.len(),
                path.display().to_string().cyan()
            );
        },
        None => print!("{}", formatted),
    }
    Ok(())
}

pub fn to_translations(table: &MappingTable) -> Translations {
    table
        .data()
        .iter()
        .map(|(name, targets)| {
            let mut targets: Vec<String> = targets.iter().cloned().collect();
            targets.sort_unstable();
            (name.clone(), targets)
        })
        .collect()
}
