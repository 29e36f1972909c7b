//! `idmap translate` command implementation

use crate::config::resolve_id_type;
use crate::error::Result;
use crate::output::{render, sorted, Translations};
use crate::OutputFormat;
use idmap_mapping::{MapOptions, Mapper, MapperConfig};
use std::io::BufRead;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct TranslateRequest {
    pub id_type: String,
    pub target_id_type: String,
    pub names: Vec<String>,
    pub strict: bool,
    pub no_cleanup: bool,
    pub keep_complexes: bool,
    pub first: bool,
    pub format: OutputFormat,
}

impl TranslateRequest {
    fn options(&self, ncbi_tax_id: u32) -> MapOptions {
        MapOptions::default()
            .organism(ncbi_tax_id)
            .strict(self.strict)
            .uniprot_cleanup(!self.no_cleanup)
            .expand_complexes(!self.keep_complexes)
    }
}

pub fn run(config: MapperConfig, mut request: TranslateRequest) -> Result<()> {
    if request.names.is_empty() {
        request.names = read_names(std::io::stdin().lock())?;
        debug!(count = request.names.len(), "Read names from stdin");
    }

    let mapper = super::mapper(config)?;
    let translations = translate(&mapper, &request)?;

    let id_type = resolve_id_type(&request.id_type)?;
    let target_id_type = resolve_id_type(&request.target_id_type)?;
    print!("{}", render(&translations, id_type, target_id_type, request.format)?);
    Ok(())
}

/// Translate every requested name; untranslated names map to an empty list
pub fn translate(mapper: &Mapper, request: &TranslateRequest) -> Result<Translations> {
    let id_type = resolve_id_type(&request.id_type)?;
    let target_id_type = resolve_id_type(&request.target_id_type)?;
    let options = request.options(mapper.config().default_ncbi_tax_id);

    let mut translations = Translations::new();
    for name in &request.names {
        let targets = if request.first {
            mapper
                .map_name0(name, id_type, target_id_type, &options)?
                .into_iter()
                .collect()
        } else {
            sorted(mapper.map_name_with(name, id_type, target_id_type, &options)?)
        };
        translations.insert(name.clone(), targets);
    }

    let translated = translations.values().filter(|t| !t.is_empty()).count();
    info!(
        id_type,
        target_id_type,
        names = translations.len(),
        translated,
        "Translation finished"
    );
    Ok(translations)
}

/// One name per line; blank lines and `#` comments are skipped
pub fn read_names(reader: impl BufRead) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if name.is_empty() || name.starts_with('#') {
            continue;
        }
        names.push(name.to_string());
    }
    Ok(names)
}
