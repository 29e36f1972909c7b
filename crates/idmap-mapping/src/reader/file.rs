//! Delimited files and built-in generated tables

use super::{insert_pair, ReadContext};
use crate::error::{MappingError, Result};
use crate::http::decompress_if_gzip;
use crate::input::{FileInput, FileSource, GeneratedTable};
use crate::organism;
use crate::table::MappingData;
use crate::uniprot::is_uniprot_ac;
use tracing::debug;

pub fn read(input: &FileInput, ncbi_tax_id: u32, ctx: &ReadContext<'_>) -> Result<MappingData> {
    match &input.source {
        FileSource::Path(path) => {
            let bytes = decompress_if_gzip(std::fs::read(path)?)?;
            let text = String::from_utf8(bytes).map_err(|e| MappingError::parse(path.display().to_string(), e))?;
            Ok(parse_delimited(&text, input))
        },
        FileSource::Url(url) => {
            let text = ctx.fetcher.get_text(url, &[])?;
            Ok(parse_delimited(&text, input))
        },
        FileSource::Generated(table) => {
            let rows = generate(table, ncbi_tax_id, ctx)?;
            Ok(rows_to_data(
                rows.iter().map(|row| row.iter().map(String::as_str).collect::<Vec<_>>()),
                input,
            ))
        },
    }
}

/// Parse text by the column configuration of `input`.
///
/// Header lines and lines too short for either column are skipped.
pub fn parse_delimited(text: &str, input: &FileInput) -> MappingData {
    let rows = text
        .lines()
        .skip(input.header)
        .filter(|line| !line.trim().is_empty())
        .map(|line| match input.separator.as_deref() {
            Some(separator) => line.split(separator).collect::<Vec<_>>(),
            None => line.split_whitespace().collect(),
        });
    rows_to_data(rows, input)
}

fn rows_to_data<'r>(rows: impl Iterator<Item = Vec<&'r str>>, input: &FileInput) -> MappingData {
    let mut data = MappingData::new();
    let mut skipped = 0usize;

    for row in rows {
        let (Some(a), Some(b)) = (row.get(input.col_a), row.get(input.col_b)) else {
            skipped += 1;
            continue;
        };
        for a in split_cell(a, input.separator2.as_deref()) {
            for b in split_cell(b, input.separator2.as_deref()) {
                insert_pair(&mut data, a, b);
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, id_type_a = %input.id_type_a, id_type_b = %input.id_type_b, "Skipped short lines");
    }
    data
}

fn split_cell<'c>(cell: &'c str, separator2: Option<&str>) -> Vec<&'c str> {
    match separator2 {
        Some(separator) => cell.split(separator).collect(),
        None => vec![cell],
    }
}

fn generate(table: &GeneratedTable, ncbi_tax_id: u32, ctx: &ReadContext<'_>) -> Result<Vec<Vec<String>>> {
    match table {
        GeneratedTable::MirbaseMature => mirbase_fasta(ctx, "mature.fa", ncbi_tax_id),
        GeneratedTable::MirbaseHairpin => mirbase_fasta(ctx, "hairpin.fa", ncbi_tax_id),
        GeneratedTable::UniprotSecondary => uniprot_secondary(ctx),
        GeneratedTable::Custom { generate, .. } => generate(ncbi_tax_id),
    }
}

/// `>hsa-miR-21-5p MIMAT0000076 Homo sapiens miR-21-5p` -> `[hsa-miR-21-5p, MIMAT0000076]`
fn mirbase_fasta(ctx: &ReadContext<'_>, file_name: &str, ncbi_tax_id: u32) -> Result<Vec<Vec<String>>> {
    let code = organism::by_tax_id(ncbi_tax_id)
        .map(|o| o.mirbase_code)
        .ok_or_else(|| MappingError::unsupported_organism("miRBase", ncbi_tax_id))?;
    let prefix = format!("{}-", code);

    let url = format!("{}/{}", ctx.config.endpoints.mirbase, file_name);
    let text = ctx.fetcher.get_text(&url, &[])?;

    Ok(parse_mirbase_headers(&text, &prefix))
}

fn parse_mirbase_headers(text: &str, prefix: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter_map(|line| line.strip_prefix('>'))
        .filter_map(|header| {
            let mut fields = header.split_whitespace();
            let name = fields.next()?;
            let accession = fields.next()?;
            name.starts_with(prefix)
                .then(|| vec![name.to_string(), accession.to_string()])
        })
        .collect()
}

/// Rows of `sec_ac.txt`: secondary accession, primary accession
fn uniprot_secondary(ctx: &ReadContext<'_>) -> Result<Vec<Vec<String>>> {
    let url = format!("{}/complete/docs/sec_ac.txt", ctx.config.endpoints.uniprot_ftp);
    let text = ctx.fetcher.get_text(&url, &[])?;
    Ok(parse_secondary_accessions(&text))
}

fn parse_secondary_accessions(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let (secondary, primary) = (fields.next()?, fields.next()?);
            (fields.next().is_none() && is_uniprot_ac(secondary) && is_uniprot_ac(primary))
                .then(|| vec![secondary.to_string(), primary.to_string()])
        })
        .collect()
}
