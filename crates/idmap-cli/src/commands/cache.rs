//! `idmap cache` command implementation
//!
//! Lists and removes cached mapping tables and reference lists.

use crate::error::{CliError, Result};
use crate::output::format_bytes;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use idmap_mapping::cache::{CacheEntry, DiskCache};
use idmap_mapping::MapperConfig;
use std::time::Duration;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

pub fn list(config: &MapperConfig) -> Result<()> {
    let cache = DiskCache::new(&config.cache_dir);
    let entries = cache.list().map_err(|e| CliError::cache(e.to_string()))?;

    if entries.is_empty() {
        println!("No cached tables in {}", cache.dir().display());
        return Ok(());
    }

    print!("{}", format_entries(&entries));
    let total: u64 = entries.iter().map(|e| e.size_bytes).sum();
    println!("{} file(s), {} in {}", entries.len(), format_bytes(total), cache.dir().display());
    Ok(())
}

pub fn clean(config: &MapperConfig, all: bool, older_than_days: Option<u64>) -> Result<()> {
    let cache = DiskCache::new(&config.cache_dir);

    let removed = match (all, older_than_days) {
        (true, _) => cache.clear(),
        (false, Some(days)) => cache.remove_older_than(Duration::from_secs(days.saturating_mul(SECONDS_PER_DAY))),
        (false, None) => {
            println!("Use --all to remove every cached table, or --older-than-days N");
            return Ok(());
        },
    }
    .map_err(|e| CliError::cache(e.to_string()))?;

    println!("{} Removed {} cached file(s)", "✓".green(), removed);
    Ok(())
}

fn format_entries(entries: &[CacheEntry]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["File", "Size", "Modified"]);

    for entry in entries {
        table.add_row(vec![
            entry.file_name.clone(),
            format_bytes(entry.size_bytes),
            entry.modified.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    format!("{}\n", table)
}
