//! `idmap config` command implementation

use crate::error::{CliError, Result};
use colored::Colorize;
use idmap_mapping::MapperConfig;

/// Print the effective configuration as TOML, followed by the variables that override it
pub fn show(config: &MapperConfig) -> Result<()> {
    println!("{}", "# Effective idmap configuration".cyan().bold());
    print!("{}", to_toml(config)?);
    println!();
    println!("{}", "# Environment overrides: IDMAP_NCBI_TAX_ID, IDMAP_CACHE_DIR, IDMAP_USE_CACHE,".cyan());
    println!("{}", "# IDMAP_TABLE_LIFETIME_SECS, IDMAP_CLEANUP_PERIOD_SECS, IDMAP_*_URL, ...".cyan());
    Ok(())
}

pub fn to_toml(config: &MapperConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::config(e.to_string()))
}
