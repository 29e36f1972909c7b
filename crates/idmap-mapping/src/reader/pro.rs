//! Protein Ontology mapping file
//!
//! `promapping.txt` rows are `PR:000000005 <TAB> UniProtKB:P37173 <TAB> is_a`.
//! One table keeps the rows whose second column carries the prefix of the
//! requested ID type.

use super::{insert_pair, ReadContext};
use crate::error::{MappingError, Result};
use crate::id_types::{self, HGNC, MGI};
use crate::table::MappingData;
use tracing::debug;

pub fn read(id_type: &str, ctx: &ReadContext<'_>) -> Result<MappingData> {
    let prefix = id_types::info(id_type)
        .and_then(|t| t.pro_prefix)
        .ok_or_else(|| MappingError::UnsupportedIdType(format!("{} is not in the Protein Ontology", id_type)))?;

    let text = ctx.fetcher.get_text(&ctx.config.endpoints.pro, &[])?;
    let data = parse(&text, id_type, prefix);
    debug!(id_type, prefix, entries = data.len(), "Parsed PRO mappings");
    Ok(data)
}

fn parse(text: &str, id_type: &str, prefix: &str) -> MappingData {
    // HGNC and MGI identifiers keep their prefix (`HGNC:11998`)
    let keep_prefix = matches!(id_type, HGNC | MGI);
    let mut data = MappingData::new();

    for line in text.lines() {
        let mut fields = line.split('\t');
        let (Some(pro_id), Some(other)) = (fields.next(), fields.next()) else {
            continue;
        };
        let Some((other_prefix, local)) = other.split_once(':') else {
            continue;
        };
        if other_prefix != prefix {
            continue;
        }
        let other = if keep_prefix { other } else { local };
        insert_pair(&mut data, pro_id, other);
    }
    data
}
