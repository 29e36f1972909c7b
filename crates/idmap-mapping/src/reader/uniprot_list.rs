//! UniProt ID mapping service
//!
//! The service maps an uploaded list of IDs, so a table is built by uploading
//! accessions (an explicit list or the organism's reference proteome) in
//! chunks. For each chunk:
//!
//! 1. `POST /idmapping/run` with `from`, `to` and the comma-joined `ids`
//! 2. poll `GET /idmapping/status/{job}` every `poll_interval` until finished,
//!    at most `max_polls` times; explicit failure messages abort at once
//! 3. `GET /idmapping/details/{job}` for the result location and download
//!    it as a TSV stream
//!
//! Only accessions are uploaded. When UniProt is the target the query runs the
//! other way round and the result is swapped; when neither side is UniProt the
//! table is joined through UniProt in two queries.

use super::{insert_pair, ReadContext};
use crate::error::{MappingError, Result};
use crate::id_types::{self, UNIPROT};
use crate::reference::ReferenceKind;
use crate::table::{swap_dict, MappingData};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

const UPLOAD_DB: &str = "UniProtKB_AC-ID";

pub fn read(
    id_type_a: &str,
    id_type_b: &str,
    uniprots: Option<&[String]>,
    ncbi_tax_id: u32,
    ctx: &ReadContext<'_>,
) -> Result<MappingData> {
    let upload: Vec<String> = match uniprots {
        Some(ids) => ids.to_vec(),
        None => {
            let mut ids: Vec<String> = ctx
                .references
                .get(ctx, ncbi_tax_id, ReferenceKind::All)
                .iter()
                .cloned()
                .collect();
            ids.sort_unstable();
            ids
        },
    };

    if upload.is_empty() {
        info!(id_type_a, id_type_b, ncbi_tax_id, "No accessions to upload");
        return Ok(MappingData::new());
    }

    if id_type_a == UNIPROT {
        from_uniprot(id_type_b, &upload, ctx)
    } else if id_type_b == UNIPROT {
        Ok(swap_dict(&from_uniprot(id_type_a, &upload, ctx)?))
    } else {
        let to_a = from_uniprot(id_type_a, &upload, ctx)?;
        let to_b = from_uniprot(id_type_b, &upload, ctx)?;

        let mut data = MappingData::new();
        for (uniprot, a_ids) in &to_a {
            let Some(b_ids) = to_b.get(uniprot) else {
                continue;
            };
            for a in a_ids {
                for b in b_ids {
                    insert_pair(&mut data, a, b);
                }
            }
        }
        Ok(data)
    }
}

/// uniprot -> `target` for every uploaded accession
fn from_uniprot(target: &str, upload: &[String], ctx: &ReadContext<'_>) -> Result<MappingData> {
    let to_db = id_types::info(target)
        .and_then(|t| t.idmapping_db)
        .ok_or_else(|| MappingError::UnsupportedIdType(format!("{} is not an ID mapping database", target)))?;

    let chunk_size = ctx.config.uniprot_list.chunk_size.max(1);
    let mut data = MappingData::new();

    for (i, chunk) in upload.chunks(chunk_size).enumerate() {
        debug!(chunk = i, size = chunk.len(), to = to_db, "Submitting ID mapping chunk");
        for (from, to) in run_job(UPLOAD_DB, to_db, chunk, ctx)? {
            insert_pair(&mut data, &from, &to);
        }
    }

    Ok(data)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunResponse {
    job_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsResponse {
    #[serde(rename = "redirectURL")]
    redirect_url: Option<String>,
}

/// Submit one job and return its `(From, To)` pairs
pub fn run_job(from: &str, to: &str, ids: &[String], ctx: &ReadContext<'_>) -> Result<Vec<(String, String)>> {
    let rest = &ctx.config.endpoints.uniprot_rest;
    let joined = ids.join(",");

    let body = ctx.fetcher.post_form(
        &format!("{}/idmapping/run", rest),
        &[("from", from), ("to", to), ("ids", joined.as_str())],
    )?;
    let job_id = serde_json::from_slice::<RunResponse>(&body)
        .ok()
        .and_then(|r| r.job_id)
        .ok_or_else(|| {
            MappingError::JobSubmission(format!(
                "no jobId in response: {}",
                String::from_utf8_lossy(&body).chars().take(200).collect::<String>()
            ))
        })?;
    info!(job_id = %job_id, from, to, ids = ids.len(), "ID mapping job submitted");

    wait_for_job(&job_id, ctx)?;

    let details: DetailsResponse =
        serde_json::from_slice(&ctx.fetcher.get(&format!("{}/idmapping/details/{}", rest, job_id))?)?;
    let redirect = details
        .redirect_url
        .ok_or_else(|| MappingError::parse("ID mapping job details", format!("job {} has no redirectURL", job_id)))?;
    let stream_url = redirect.replacen("/results/", "/results/stream/", 1);

    let tsv = ctx.fetcher.get_text(&stream_url, &[("format", "tsv")])?;
    let pairs = parse_results(&tsv);
    debug!(job_id = %job_id, pairs = pairs.len(), "ID mapping results downloaded");
    Ok(pairs)
}

fn wait_for_job(job_id: &str, ctx: &ReadContext<'_>) -> Result<()> {
    let settings = &ctx.config.uniprot_list;
    let max_polls = settings.max_polls();
    let url = format!("{}/idmapping/status/{}", ctx.config.endpoints.uniprot_rest, job_id);

    for poll in 0..max_polls {
        let status: Value = serde_json::from_slice(&ctx.fetcher.get(&url)?)?;

        let messages: Vec<String> = status
            .get("messages")
            .and_then(Value::as_array)
            .map(|m| m.iter().map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string())).collect())
            .unwrap_or_default();
        if !messages.is_empty() {
            return Err(MappingError::JobFailed {
                job_id: job_id.to_string(),
                messages,
            });
        }

        if status.get("results").is_some() {
            return Ok(());
        }

        match status.get("jobStatus").and_then(Value::as_str) {
            Some("FINISHED") => return Ok(()),
            Some("RUNNING") | Some("NEW") => {
                debug!(job_id, poll, "ID mapping job still running");
                std::thread::sleep(settings.poll_interval());
            },
            other => {
                return Err(MappingError::JobFailed {
                    job_id: job_id.to_string(),
                    messages: vec![format!("unexpected job status {:?}", other)],
                })
            },
        }
    }

    Err(MappingError::JobTimeout {
        job_id: job_id.to_string(),
        polls: max_polls,
    })
}

fn parse_results(tsv: &str) -> Vec<(String, String)> {
    tsv.lines()
        .filter(|line| !line.starts_with("From\t"))
        .filter_map(|line| line.split_once('\t'))
        .map(|(from, to)| (from.trim().to_string(), to.trim().to_string()))
        .filter(|(from, to)| !from.is_empty() && !to.is_empty())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}
