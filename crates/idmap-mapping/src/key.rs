use crate::organism::NOT_ORGANISM_SPECIFIC;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one directional translation table: source type, target type, organism.
///
/// `A -> B` and `B -> A` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MappingTableKey {
    pub id_type: String,
    pub target_id_type: String,
    pub ncbi_tax_id: u32,
}

impl MappingTableKey {
    pub fn new(id_type: impl Into<String>, target_id_type: impl Into<String>, ncbi_tax_id: u32) -> Self {
        Self {
            id_type: id_type.into(),
            target_id_type: target_id_type.into(),
            ncbi_tax_id,
        }
    }

    pub fn reversed(&self) -> Self {
        Self {
            id_type: self.target_id_type.clone(),
            target_id_type: self.id_type.clone(),
            ncbi_tax_id: self.ncbi_tax_id,
        }
    }

    /// The same pair of ID types, shared across organisms
    pub fn organism_agnostic(&self) -> Self {
        Self {
            ncbi_tax_id: NOT_ORGANISM_SPECIFIC,
            ..self.clone()
        }
    }

    pub fn is_organism_agnostic(&self) -> bool {
        self.ncbi_tax_id == NOT_ORGANISM_SPECIFIC
    }
}

impl fmt::Display for MappingTableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} [{}]", self.id_type, self.target_id_type, self.ncbi_tax_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_direction_matters() {
        let forward = MappingTableKey::new("genesymbol", "uniprot", 9606);
        let backward = forward.reversed();

        assert_ne!(forward, backward);
        assert_eq!(backward.reversed(), forward);

        let keys: HashSet<_> = [forward.clone(), backward].into_iter().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(forward.to_string(), "genesymbol -> uniprot [9606]");
    }

    #[test]
    fn test_organism_agnostic() {
        let key = MappingTableKey::new("chebi", "hmdb", 9606);
        let shared = key.organism_agnostic();
        assert!(shared.is_organism_agnostic());
        assert_eq!(shared.id_type, "chebi");
        assert!(!key.is_organism_agnostic());
    }
}
