//! UniProt REST queries
//!
//! One stream query per table: `accession` plus one return field for all
//! entries of an organism. Also the UniSave history lookups used to recover
//! gene symbols of deleted accessions.

use super::{insert_pair, ReadContext};
use crate::error::{MappingError, Result};
use crate::id_types::{self, GENESYMBOL, GENESYMBOL_SYN, PROTEIN_NAME};
use crate::table::MappingData;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

pub fn read(id_type: &str, swissprot: Option<bool>, ncbi_tax_id: u32, ctx: &ReadContext<'_>) -> Result<MappingData> {
    let field = id_types::info(id_type)
        .and_then(|t| t.uniprot_field)
        .ok_or_else(|| MappingError::UnsupportedIdType(format!("{} has no UniProt field", id_type)))?;

    let mut query = format!("organism_id:{}", ncbi_tax_id);
    match swissprot {
        Some(true) => query.push_str(" AND reviewed:true"),
        Some(false) => query.push_str(" AND reviewed:false"),
        None => {},
    }
    let fields = format!("accession,{}", field);

    let url = format!("{}/uniprotkb/stream", ctx.config.endpoints.uniprot_rest);
    let text = ctx.fetcher.get_text(
        &url,
        &[("query", query.as_str()), ("fields", fields.as_str()), ("format", "tsv")],
    )?;

    parse_stream(&text, id_type)
}

/// Parse the two-column TSV (`Entry`, field) into accession -> values
pub fn parse_stream(text: &str, id_type: &str) -> Result<MappingData> {
    let mut lines = text.lines();
    match lines.next() {
        Some(header) if header.starts_with("Entry") => {},
        Some(header) => {
            return Err(MappingError::parse(
                "UniProt stream",
                format!("unexpected header '{}'", header),
            ))
        },
        None => return Ok(MappingData::new()),
    }

    let mut data = MappingData::new();
    for line in lines {
        let Some((accession, value)) = line.split_once('\t') else {
            continue;
        };
        for value in split_field(value, id_type) {
            insert_pair(&mut data, accession, &value);
        }
    }
    Ok(data)
}

fn split_field(value: &str, id_type: &str) -> Vec<String> {
    match id_type {
        PROTEIN_NAME => protein_names(value).into_iter().collect(),
        GENESYMBOL | GENESYMBOL_SYN => value
            .split(';')
            .flat_map(str::split_whitespace)
            .map(str::to_string)
            .collect(),
        _ => value
            .split(';')
            .map(|v| {
                // `ENST00000269305.9 [P04637-1]` -> `ENST00000269305.9`
                v.split_once(" [").map(|(id, _)| id).unwrap_or(v).trim().to_string()
            })
            .filter(|v| !v.is_empty())
            .collect(),
    }
}

/// Split a UniProt protein name into its primary name and synonyms.
///
/// `Cellular tumor antigen p53 (Antigen NY-CO-13) (Phosphoprotein p53)` yields
/// the three names. Bracketed `[Cleaved into: ...]` and `[Includes: ...]`
/// blocks contribute the names of their components.
pub fn protein_names(value: &str) -> HashSet<String> {
    let mut names = HashSet::new();
    let mut primary = String::new();
    let mut group = String::new();
    let mut depth = 0usize;
    let mut opener = ' ';

    for c in value.chars() {
        match c {
            '(' | '[' if depth == 0 => {
                depth = 1;
                opener = c;
                group.clear();
            },
            '(' | '[' => {
                depth += 1;
                group.push(c);
            },
            ')' | ']' if depth == 1 => {
                depth = 0;
                if opener == '[' {
                    names.extend(bracket_block_names(&group));
                } else {
                    push_name(&mut names, &group);
                }
            },
            ')' | ']' if depth > 1 => {
                depth -= 1;
                group.push(c);
            },
            _ if depth > 0 => group.push(c),
            _ => primary.push(c),
        }
    }

    push_name(&mut names, &primary);
    names
}

fn bracket_block_names(block: &str) -> HashSet<String> {
    let block = block.trim();
    let body = block
        .strip_prefix("Cleaved into:")
        .or_else(|| block.strip_prefix("Includes:"))
        .unwrap_or(block);

    body.split("; ").flat_map(protein_names).collect()
}

fn push_name(names: &mut HashSet<String>, name: &str) {
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if !name.is_empty() {
        names.insert(name);
    }
}

// ============================================================================
// UniSave
// ============================================================================

#[derive(Deserialize)]
struct UnisaveHistory {
    #[serde(default)]
    results: Vec<UnisaveVersion>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnisaveVersion {
    entry_version: Option<u64>,
}

/// Gene symbols from the last archived version of a (deleted) accession
pub fn deleted_genesymbols(accession: &str, ctx: &ReadContext<'_>) -> Result<HashSet<String>> {
    let url = format!("{}/unisave/{}", ctx.config.endpoints.uniprot_rest, accession);

    let history: UnisaveHistory = serde_json::from_slice(&ctx.fetcher.get_with_query(&url, &[("format", "json")])?)?;
    let Some(last) = history.results.iter().filter_map(|v| v.entry_version).max() else {
        debug!(accession, "No archived versions");
        return Ok(HashSet::new());
    };

    let version = last.to_string();
    let entry = ctx
        .fetcher
        .get_text(&url, &[("format", "txt"), ("versions", version.as_str())])?;

    Ok(gene_names_from_entry(&entry))
}

/// `GN   Name=TP53 {ECO:0000312}; Synonyms=P53;` -> `{TP53}`
fn gene_names_from_entry(entry: &str) -> HashSet<String> {
    entry
        .lines()
        .filter(|line| line.starts_with("GN   "))
        .flat_map(|line| line.split(';'))
        .filter_map(|part| part.trim().strip_prefix("GN   ").unwrap_or(part.trim()).strip_prefix("Name="))
        .filter_map(|name| name.split(" {").next())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{Endpoints, MapperConfig};
    use crate::http::MockFetcher;
    use crate::reference::ReferenceLists;
    use pretty_assertions::assert_eq;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_protein_name_decomposition() {
        let names = protein_names("Cellular tumor antigen p53 (Antigen NY-CO-13) (Phosphoprotein p53) (Tumor suppressor p53)");
        assert_eq!(
            names,
            set(&["Cellular tumor antigen p53", "Antigen NY-CO-13", "Phosphoprotein p53", "Tumor suppressor p53"])
        );
    }

    #[test]
    fn test_protein_name_cleaved_blocks() {
        let names = protein_names("Insulin [Cleaved into: Insulin B chain; Insulin A chain]");
        assert_eq!(names, set(&["Insulin", "Insulin B chain", "Insulin A chain"]));

        let nested = protein_names("Interleukin-1 receptor (IL-1R (type 1)) (EC 3.2.2.6)");
        assert!(nested.contains("IL-1R (type 1)"));
        assert!(nested.contains("Interleukin-1 receptor"));
    }

    #[test]
    fn test_parse_stream_fields() {
        let text = "Entry\tGene Names (primary)\nP04637\tTP53\nP38398\tBRCA1\nQ00000\t\n";
        let data = parse_stream(text, GENESYMBOL).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data["P04637"], set(&["TP53"]));

        let text = "Entry\tEnsembl\nP04637\tENST00000269305.9 [P04637-1];ENST00000445888.6 [P04637-1];\n";
        let data = parse_stream(text, "enst").unwrap();
        assert_eq!(data["P04637"], set(&["ENST00000269305.9", "ENST00000445888.6"]));
    }

    #[test]
    fn test_parse_stream_rejects_unexpected_header() {
        let err = parse_stream("<html>Service down</html>\n", GENESYMBOL).unwrap_err();
        assert!(matches!(err, MappingError::Parse { .. }));
    }

    #[test]
    fn test_read_builds_query() {
        let config = MapperConfig::default().with_endpoints(Endpoints::all_at("http://mock"));
        let fetcher = MockFetcher::new().with_response("http://mock/uniprotkb/stream", "Entry\tGeneID\nP04637\t7157;\n");
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &refs);

        let data = read("entrez", Some(true), 9606, &ctx).unwrap();
        assert_eq!(data["P04637"], set(&["7157"]));

        let url = &fetcher.requests()[0].url;
        assert!(url.contains("fields=accession%2Cxref_geneid"));
        assert!(url.contains("reviewed%3Atrue"));
    }

    #[test]
    fn test_deleted_genesymbols() {
        let config = MapperConfig::default().with_endpoints(Endpoints::all_at("http://mock"));
        let fetcher = MockFetcher::new()
            .with_response(
                "http://mock/unisave/Q9UNA3?format=json",
                r#"{"results":[{"entryVersion":12},{"entryVersion":41},{"entryVersion":7}]}"#,
            )
            .with_response(
                "http://mock/unisave/Q9UNA3?format=txt&versions=41",
                "ID   A4GCT_HUMAN\nGN   Name=A4GNT {ECO:0000312|HGNC:HGNC:17968}; Synonyms=ALPHA4GNT;\n",
            );
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &refs);

        assert_eq!(deleted_genesymbols("Q9UNA3", &ctx).unwrap(), set(&["A4GNT"]));
    }
}
