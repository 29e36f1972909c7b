//! Ensembl BioMart queries
//!
//! A query is an XML document passed in the `query` parameter of a GET
//! request; the answer is a headerless TSV with one column per attribute.

use super::{insert_pair, ReadContext};
use crate::error::{MappingError, Result};
use crate::id_types;
use crate::organism::{self, Organism};
use crate::table::MappingData;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::{debug, warn};

/// Two attributes of the organism's gene dataset, A -> B
pub fn read(id_type_a: &str, id_type_b: &str, ncbi_tax_id: u32, ctx: &ReadContext<'_>) -> Result<MappingData> {
    let organism = organism_for(ncbi_tax_id)?;
    let attr_a = attribute(id_type_a)?;
    let attr_b = attribute(id_type_b)?;

    query_pair(&organism.biomart_dataset(), attr_a, attr_b, ctx)
}

/// Probe IDs of every array of `vendor` for the organism -> `id_type`
pub fn read_array(vendor: &str, id_type: &str, ncbi_tax_id: u32, ctx: &ReadContext<'_>) -> Result<MappingData> {
    let organism = organism_for(ncbi_tax_id)?;
    let target = attribute(id_type)?;
    let dataset = organism.biomart_dataset();

    let mut data = MappingData::new();
    for array in organism.array_attributes(vendor) {
        match query_pair(&dataset, array, target, ctx) {
            Ok(rows) => {
                debug!(array, probes = rows.len(), "Loaded array probes");
                for (probe, ids) in rows {
                    for id in ids {
                        insert_pair(&mut data, &probe, &id);
                    }
                }
            },
            Err(e) if e.is_unavailable() => {
                warn!(array, dataset = %dataset, error = %e, "Array attribute unavailable, skipping");
            },
            Err(e) => return Err(e),
        }
    }
    Ok(data)
}

fn organism_for(ncbi_tax_id: u32) -> Result<&'static Organism> {
    organism::by_tax_id(ncbi_tax_id)
        .ok_or_else(|| MappingError::unsupported_organism("BioMart", ncbi_tax_id))
}

fn attribute(id_type: &str) -> Result<&'static str> {
    id_types::info(id_type)
        .and_then(|t| t.biomart_attr)
        .ok_or_else(|| MappingError::UnsupportedIdType(format!("{} has no BioMart attribute", id_type)))
}

fn query_pair(dataset: &str, attr_a: &str, attr_b: &str, ctx: &ReadContext<'_>) -> Result<MappingData> {
    let xml = query_xml(dataset, &[attr_a, attr_b])?;
    let text = ctx
        .fetcher
        .get_text(&ctx.config.endpoints.biomart, &[("query", xml.as_str())])?;

    if text.trim_start().starts_with("Query ERROR") {
        return Err(MappingError::JobFailed {
            job_id: "biomart".to_string(),
            messages: vec![text.lines().next().unwrap_or_default().to_string()],
        });
    }

    let mut data = MappingData::new();
    for line in text.lines() {
        if let Some((a, b)) = line.split_once('\t') {
            insert_pair(&mut data, a, b);
        }
    }
    Ok(data)
}

/// Serialize a BioMart query selecting `attributes` from `dataset`
pub fn query_xml(dataset: &str, attributes: &[&str]) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    let xml_err = |e: std::io::Error| MappingError::Xml(e.to_string());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::DocType(BytesText::from_escaped("Query")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("Query").with_attributes([
            ("virtualSchemaName", "default"),
            ("formatter", "TSV"),
            ("header", "0"),
            ("uniqueRows", "1"),
            ("count", ""),
            ("datasetConfigVersion", "0.6"),
        ])))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("Dataset").with_attributes([("name", dataset), ("interface", "default")]),
        ))
        .map_err(xml_err)?;
    for attribute in attributes {
        writer
            .write_event(Event::Empty(BytesStart::new("Attribute").with_attributes([("name", *attribute)])))
            .map_err(xml_err)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new("Dataset")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("Query")))
        .map_err(xml_err)?;

    String::from_utf8(writer.into_inner()).map_err(|e| MappingError::Xml(e.to_string()))
}
