//! Rendering translation results

use crate::error::Result;
use crate::OutputFormat;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use std::collections::{BTreeMap, HashSet};

/// Names with their translations, sorted for stable output
pub type Translations = BTreeMap<String, Vec<String>>;

pub fn sorted(targets: HashSet<String>) -> Vec<String> {
    let mut targets: Vec<String> = targets.into_iter().collect();
    targets.sort_unstable();
    targets
}

/// Render `name -> targets`. Untranslated names appear with an empty target
/// in `table` and `tsv`, and as an empty list in `json`.
pub fn render(translations: &Translations, id_type: &str, target_id_type: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(as_table(translations, id_type, target_id_type)),
        OutputFormat::Tsv => Ok(as_tsv(translations)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(translations)?)),
    }
}

fn as_table(translations: &Translations, id_type: &str, target_id_type: &str) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![id_type, target_id_type]);

    for (name, targets) in translations {
        table.add_row(vec![name.clone(), targets.join(", ")]);
    }

    format!("{}\n", table)
}

fn as_tsv(translations: &Translations) -> String {
    let mut output = String::new();
    for (name, targets) in translations {
        if targets.is_empty() {
            output.push_str(name);
            output.push_str("\t\n");
        }
        for target in targets {
            output.push_str(name);
            output.push('\t');
            output.push_str(target);
            output.push('\n');
        }
    }
    output
}

/// Human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Translations {
        let mut translations = Translations::new();
        translations.insert("TP53".to_string(), vec!["P04637".to_string()]);
        translations.insert("BRCA1".to_string(), vec!["P38398".to_string(), "Q3LRJ0".to_string()]);
        translations.insert("TP99999".to_string(), Vec::new());
        translations
    }

    #[test]
    fn test_tsv_one_pair_per_line() {
        let tsv = render(&sample(), "genesymbol", "uniprot", OutputFormat::Tsv).unwrap();
        assert_eq!(tsv, "BRCA1\tP38398\nBRCA1\tQ3LRJ0\nTP53\tP04637\nTP99999\t\n");
    }

    #[test]
    fn test_json_object() {
        let json = render(&sample(), "genesymbol", "uniprot", OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["BRCA1"][1], "Q3LRJ0");
        assert_eq!(value["TP99999"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_table_has_header() {
        let table = render(&sample(), "genesymbol", "uniprot", OutputFormat::Table).unwrap();
        assert!(table.contains("genesymbol"));
        assert!(table.contains("P38398, Q3LRJ0"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_sorted() {
        let targets: HashSet<String> = ["b", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(sorted(targets), vec!["a", "b"]);
    }
}
