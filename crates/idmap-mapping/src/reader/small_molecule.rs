//! Small molecule cross-references: UniChem, RaMP and HMDB
//!
//! All three are organism agnostic.

use super::{insert_pair, ReadContext};
use crate::error::{MappingError, Result};
use crate::id_types::{self, IdTypeInfo};
use crate::table::{swap_dict, MappingData};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Cursor, Read};
use tracing::debug;

const ZIP_MAGIC: &[u8] = b"PK";

fn info(id_type: &str) -> Result<&'static IdTypeInfo> {
    id_types::info(id_type).ok_or_else(|| MappingError::UnsupportedIdType(id_type.to_string()))
}

fn field<T>(id_type: &str, backend: &str, get: impl Fn(&IdTypeInfo) -> Option<T>) -> Result<T> {
    get(info(id_type)?)
        .ok_or_else(|| MappingError::UnsupportedIdType(format!("{} is not available from {}", id_type, backend)))
}

// ============================================================================
// UniChem
// ============================================================================

/// Pairwise source mapping file `src{a}src{b}.txt.gz`, published for `a < b` only
pub fn read_unichem(id_type_a: &str, id_type_b: &str, ctx: &ReadContext<'_>) -> Result<MappingData> {
    let src_a = field(id_type_a, "UniChem", |t| t.unichem_src)?;
    let src_b = field(id_type_b, "UniChem", |t| t.unichem_src)?;
    let (low, high) = if src_a <= src_b { (src_a, src_b) } else { (src_b, src_a) };

    let url = format!("{}/src_id{}/src{}src{}.txt.gz", ctx.config.endpoints.unichem, low, low, high);
    let text = ctx.fetcher.get_text(&url, &[])?;

    let mut data = MappingData::new();
    for line in text.lines().skip(1) {
        if let Some((low_id, high_id)) = line.split_once('\t') {
            insert_pair(&mut data, low_id, high_id);
        }
    }

    if src_a <= src_b {
        Ok(data)
    } else {
        Ok(swap_dict(&data))
    }
}

// ============================================================================
// RaMP
// ============================================================================

/// The RaMP `source` table: every `sourceId` with the `rampId` it belongs to.
/// IDs sharing a `rampId` map to each other.
pub fn read_ramp(id_type_a: &str, id_type_b: &str, ctx: &ReadContext<'_>) -> Result<MappingData> {
    let type_a = field(id_type_a, "RaMP", |t| t.ramp_type)?;
    let type_b = field(id_type_b, "RaMP", |t| t.ramp_type)?;

    let bytes = ctx.fetcher.get(&ctx.config.endpoints.ramp)?;
    parse_ramp(bytes.as_slice(), type_a, type_b)
}

fn parse_ramp(source: impl Read, type_a: &str, type_b: &str) -> Result<MappingData> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .quoting(false)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| MappingError::parse("RaMP source table", format!("missing column '{}'", name)))
    };
    let (ramp_col, source_col, type_col) = (column("rampId")?, column("sourceId")?, column("IDtype")?);

    let mut groups: HashMap<String, (Vec<String>, Vec<String>)> = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let (Some(ramp_id), Some(source_id), Some(id_type)) =
            (record.get(ramp_col), record.get(source_col), record.get(type_col))
        else {
            continue;
        };

        // `hmdb:HMDB0000001` -> `HMDB0000001`
        let id = source_id.split_once(':').map(|(_, id)| id).unwrap_or(source_id).to_string();
        let group = groups.entry(ramp_id.to_string()).or_default();
        if id_type == type_a {
            group.0.push(id.clone());
        }
        if id_type == type_b {
            group.1.push(id);
        }
    }

    let mut data = MappingData::new();
    for (a_ids, b_ids) in groups.values() {
        for a in a_ids {
            for b in b_ids {
                insert_pair(&mut data, a, b);
            }
        }
    }
    debug!(groups = groups.len(), entries = data.len(), "Parsed RaMP source table");
    Ok(data)
}

// ============================================================================
// HMDB
// ============================================================================

/// Fields of each `<metabolite>` record in the HMDB XML dump (optionally zipped)
pub fn read_hmdb(id_type_a: &str, id_type_b: &str, ctx: &ReadContext<'_>) -> Result<MappingData> {
    let field_a = field(id_type_a, "HMDB", |t| t.hmdb_field)?;
    let field_b = field(id_type_b, "HMDB", |t| t.hmdb_field)?;

    let bytes = ctx.fetcher.get(&ctx.config.endpoints.hmdb)?;
    if !bytes.starts_with(ZIP_MAGIC) {
        return parse_hmdb(bytes.as_slice(), field_a, field_b);
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.name().ends_with(".xml") {
            debug!(entry = entry.name(), "Reading HMDB archive entry");
            return parse_hmdb(BufReader::new(entry), field_a, field_b);
        }
    }
    Err(MappingError::parse("HMDB archive", "no .xml entry"))
}

/// Stream `<metabolite>` records, taking `field_a` and `field_b` from their direct children
fn parse_hmdb(source: impl BufRead, field_a: &str, field_b: &str) -> Result<MappingData> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(true);

    let mut data = MappingData::new();
    let mut buf = Vec::new();
    // depth below <metabolite>, None outside a record
    let mut depth: Option<usize> = None;
    let mut current: Option<String> = None;
    let mut text = String::new();
    let mut values_a: Vec<String> = Vec::new();
    let mut values_b: Vec<String> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match depth {
                    None if name == "metabolite" => {
                        depth = Some(0);
                        values_a.clear();
                        values_b.clear();
                    },
                    None => {},
                    Some(d) => {
                        if d == 0 {
                            current = Some(name);
                            text.clear();
                        }
                        depth = Some(d + 1);
                    },
                }
            },
            Event::Text(t) => {
                if depth == Some(1) && current.is_some() {
                    text.push_str(&t.unescape()?);
                }
            },
            Event::End(_) => match depth {
                Some(0) => {
                    depth = None;
                    for a in &values_a {
                        for b in &values_b {
                            insert_pair(&mut data, a, b);
                        }
                    }
                },
                Some(d) => {
                    if d == 1 {
                        if let Some(name) = current.take() {
                            if name == field_a {
                                values_a.push(text.clone());
                            }
                            if name == field_b {
                                values_b.push(text.clone());
                            }
                        }
                    }
                    depth = Some(d - 1);
                },
                None => {},
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }

    Ok(data)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::{Endpoints, MapperConfig};
    use crate::http::MockFetcher;
    use crate::reference::ReferenceLists;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::io::Write;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    const HMDB_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<hmdb xmlns="http://www.hmdb.ca">
<metabolite>
  <accession>HMDB0000001</accession>
  <secondary_accessions>
    <accession>HMDB00001</accession>
  </secondary_accessions>
  <name>1-Methylhistidine</name>
  <chebi_id>50599</chebi_id>
  <kegg_id>C01152</kegg_id>
</metabolite>
<metabolite>
  <accession>HMDB0000002</accession>
  <chebi_id/>
</metabolite>
</hmdb>
"#;

    #[test]
    fn test_unichem_swaps_high_low() {
        let config = MapperConfig::default().with_endpoints(Endpoints::all_at("http://mock"));
        let fetcher = MockFetcher::new().with_response(
            "http://mock/unichem/src_id7/src7src18.txt.gz",
            "From src:'7'\tTo src:'18'\n15377\tHMDB0002111\n",
        );
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &refs);

        let forward = read_unichem("chebi", "hmdb", &ctx).unwrap();
        assert_eq!(forward["15377"], set(&["HMDB0002111"]));

        let backward = read_unichem("hmdb", "chebi", &ctx).unwrap();
        assert_eq!(backward["HMDB0002111"], set(&["15377"]));
    }

    #[test]
    fn test_ramp_groups_by_ramp_id() {
        let table = "sourceId\tIDtype\tgeneOrCompound\tcommonName\trampId\n\
                     hmdb:HMDB0000001\thmdb\tcompound\t1-Methylhistidine\tRAMP_C_000000001\n\
                     chebi:50599\tchebi\tcompound\t1-Methylhistidine\tRAMP_C_000000001\n\
                     kegg:C01152\tkegg\tcompound\t1-Methylhistidine\tRAMP_C_000000001\n\
                     chebi:15377\tchebi\tcompound\twater\tRAMP_C_000000002\n";

        let data = parse_ramp(table.as_bytes(), "hmdb", "chebi").unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data["HMDB0000001"], set(&["50599"]));
    }

    #[test]
    fn test_ramp_missing_column() {
        let err = parse_ramp("sourceId\tIDtype\nchebi:1\tchebi\n".as_bytes(), "hmdb", "chebi").unwrap_err();
        assert!(matches!(err, MappingError::Parse { .. }));
    }

    #[test]
    fn test_hmdb_direct_children_only() {
        let data = parse_hmdb(HMDB_XML.as_bytes(), "accession", "chebi_id").unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data["HMDB0000001"], set(&["50599"]));
    }

    #[test]
    fn test_hmdb_zipped_download() {
        let mut archive = zip::ZipWriter::new(Cursor::new(Vec::new()));
        archive
            .start_file("hmdb_metabolites.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        archive.write_all(HMDB_XML.as_bytes()).unwrap();
        let bytes = archive.finish().unwrap().into_inner();

        let config = MapperConfig::default().with_endpoints(Endpoints::all_at("http://mock"));
        let fetcher = MockFetcher::new().with_response("http://mock/hmdb/hmdb_metabolites.xml", bytes);
        let refs = ReferenceLists::new();
        let ctx = ReadContext::new(&fetcher, &config, None, &refs);

        let data = read_hmdb("kegg", "hmdb", &ctx).unwrap();
        assert_eq!(data["C01152"], set(&["HMDB0000001"]));
    }
}
