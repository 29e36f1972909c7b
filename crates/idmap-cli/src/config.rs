//! Effective configuration for one CLI invocation
//!
//! Precedence, lowest first: built-in defaults, the `--config` TOML file,
//! `IDMAP_*` environment variables, then the global command-line flags.

use crate::error::{CliError, Result};
use idmap_mapping::{id_types, organism, MapperConfig};
use std::path::Path;

/// Load the mapper configuration and apply the global flags
pub fn load(config_path: Option<&Path>, cache_dir: Option<&Path>, organism: Option<&str>) -> Result<MapperConfig> {
    let mut config = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config(format!("config file '{}' not found", path.display())));
            }
            MapperConfig::from_file(path)?
        },
        None => MapperConfig::from_env()?,
    };

    if let Some(dir) = cache_dir {
        config = config.with_cache_dir(dir);
    }
    if let Some(query) = organism {
        config = config.with_ncbi_tax_id(resolve_organism(query)?);
    }

    Ok(config)
}

/// Canonical ID type for a name or label given on the command line
pub fn resolve_id_type(name: &str) -> Result<&'static str> {
    id_types::resolve(name).ok_or_else(|| CliError::UnknownIdType(name.to_string()))
}

pub fn resolve_organism(query: &str) -> Result<u32> {
    organism::resolve(query).ok_or_else(|| CliError::UnknownOrganism(query.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_resolve_id_type() {
        assert_eq!(resolve_id_type("genesymbol").unwrap(), "genesymbol");
        assert_eq!(resolve_id_type("GeneSymbol").unwrap(), "genesymbol");
        assert!(matches!(resolve_id_type("no-such-type"), Err(CliError::UnknownIdType(_))));
    }

    #[test]
    fn test_resolve_organism() {
        assert_eq!(resolve_organism("9606").unwrap(), 9606);
        assert_eq!(resolve_organism("mouse").unwrap(), 10090);
        assert!(matches!(resolve_organism("unicorn"), Err(CliError::UnknownOrganism(_))));
    }

    #[test]
    #[serial]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idmap.toml");
        std::fs::write(&path, "default_ncbi_tax_id = 10116\nuse_cache = false\n").unwrap();

        let from_file = load(Some(&path), None, None).unwrap();
        assert_eq!(from_file.default_ncbi_tax_id, 10116);
        assert!(!from_file.use_cache);

        let cache = dir.path().join("cache");
        let overridden = load(Some(&path), Some(&cache), Some("human")).unwrap();
        assert_eq!(overridden.default_ncbi_tax_id, 9606);
        assert_eq!(overridden.cache_dir, cache);
    }

    #[test]
    #[serial]
    fn test_missing_config_file() {
        let err = load(Some(Path::new("/nonexistent/idmap.toml")), None, None).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
