//! `idmap id-types` command implementation
//!
//! Lists the registered ID types with the backends able to serve them.

use crate::error::Result;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use idmap_mapping::id_types::{self, IdTypeInfo};

pub fn run(entity: Option<String>) -> Result<()> {
    let selected: Vec<&IdTypeInfo> = id_types::all()
        .iter()
        .filter(|t| {
            entity
                .as_deref()
                .is_none_or(|e| t.entity.to_string().eq_ignore_ascii_case(e.trim()))
        })
        .collect();

    print!("{}", format_table(&selected));
    Ok(())
}

/// Names of the backends that know this ID type
pub fn backends(info: &IdTypeInfo) -> Vec<&'static str> {
    [
        ("uniprot", info.uniprot_field.is_some()),
        ("idmapping", info.idmapping_db.is_some()),
        ("biomart", info.biomart_attr.is_some()),
        ("uniprot-static", info.uniprot_static_col.is_some()),
        ("unichem", info.unichem_src.is_some()),
        ("ramp", info.ramp_type.is_some()),
        ("hmdb", info.hmdb_field.is_some()),
        ("pro", info.pro_prefix.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, known)| known.then_some(name))
    .collect()
}

fn format_table(types: &[&IdTypeInfo]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Name", "Label", "Entity", "Backends"]);

    for info in types {
        table.add_row(vec![
            info.name.to_string(),
            info.label.to_string(),
            info.entity.to_string(),
            backends(info).join(", "),
        ]);
    }

    format!("{}\n", table)
}
