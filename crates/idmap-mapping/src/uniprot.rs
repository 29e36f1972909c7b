//! UniProt accession format
//!
//! The grammar is the one published by UniProt for primary accessions:
//! `[OPQ][0-9][A-Z0-9]{3}[0-9]` or `[A-NR-Z][0-9]([A-Z][A-Z0-9]{2}[0-9]){1,2}`.
//! An isoform suffix (`-2`) is accepted, so `Q9Y6K9-2` is a valid accession.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

pub const UNIPROT_AC_PATTERN: &str =
    r"^(?:[OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9](?:[A-Z][A-Z0-9]{2}[0-9]){1,2})(?:-[0-9]+)?$";

#[allow(clippy::expect_used)]
static UNIPROT_AC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(UNIPROT_AC_PATTERN).expect("UniProt accession pattern compiles"));

pub fn is_uniprot_ac(candidate: &str) -> bool {
    UNIPROT_AC.is_match(candidate)
}

/// Keep only strings that are well-formed UniProt accessions
pub fn only_uniprot_ac<I, S>(candidates: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .filter(|c| is_uniprot_ac(c.as_ref()))
        .map(|c| c.as_ref().to_string())
        .collect()
}

/// `P04637-2` -> `P04637`
pub fn strip_isoform(accession: &str) -> &str {
    match accession.split_once('-') {
        Some((canonical, isoform)) if isoform.chars().all(|c| c.is_ascii_digit()) => canonical,
        _ => accession,
    }
}
