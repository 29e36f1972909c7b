//! Process-wide set of loaded tables
//!
//! Shared between the [`crate::Mapper`] and its background sweeper. Lookups
//! take the read lock; loads, evictions and reverse derivations take the write
//! lock. Keys whose load failed are remembered so they are not retried on
//! every call.

use crate::key::MappingTableKey;
use crate::table::MappingTable;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Default)]
pub struct TableRegistry {
    tables: RwLock<HashMap<MappingTableKey, Arc<MappingTable>>>,
    failed: Mutex<HashMap<MappingTableKey, Instant>>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table under `key`; refreshes its last-use timestamp
    pub fn get(&self, key: &MappingTableKey) -> Option<Arc<MappingTable>> {
        let table = self.tables.read().get(key).cloned()?;
        table.touch();
        Some(table)
    }

    pub fn contains(&self, key: &MappingTableKey) -> bool {
        self.tables.read().contains_key(key)
    }

    /// Register `table` under its own key, replacing any previous one
    pub fn insert(&self, table: MappingTable) -> Arc<MappingTable> {
        let key = table.key();
        let table = Arc::new(table);
        self.tables.write().insert(key.clone(), Arc::clone(&table));
        self.failed.lock().remove(&key);
        table
    }

    pub fn remove(&self, key: &MappingTableKey) -> Option<Arc<MappingTable>> {
        self.tables.write().remove(key)
    }

    pub fn clear(&self) {
        self.tables.write().clear();
        self.failed.lock().clear();
    }

    /// Loaded keys, sorted
    pub fn keys(&self) -> Vec<MappingTableKey> {
        let mut keys: Vec<_> = self.tables.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    pub fn mark_failed(&self, key: MappingTableKey) {
        self.failed.lock().insert(key, Instant::now());
    }

    pub fn is_failed(&self, key: &MappingTableKey) -> bool {
        self.failed.lock().contains_key(key)
    }

    /// Evict expired tables and forget load failures older than `failure_ttl`
    pub fn remove_expired(&self, now: Instant, failure_ttl: Duration) -> Vec<MappingTableKey> {
        let mut removed = Vec::new();
        {
            let mut tables = self.tables.write();
            tables.retain(|key, table| {
                let keep = !table.is_expired(now);
                if !keep {
                    removed.push(key.clone());
                }
                keep
            });
        }

        self.failed
            .lock()
            .retain(|_, failed_at| now.saturating_duration_since(*failed_at) <= failure_ttl);

        for key in &removed {
            debug!(key = %key, "Evicted expired table");
        }
        removed.sort();
        removed
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::table::MappingData;
    use std::collections::HashSet;

    fn table(a: &str, b: &str, lifetime: Duration) -> MappingTable {
        let mut data = MappingData::new();
        data.insert("TP53".to_string(), HashSet::from(["P04637".to_string()]));
        MappingTable::new(data, a, b, 9606, lifetime)
    }

    #[test]
    fn test_insert_get_remove() {
        let registry = TableRegistry::new();
        let inserted = registry.insert(table("genesymbol", "uniprot", Duration::from_secs(60)));
        let key = inserted.key();

        assert!(registry.contains(&key));
        assert_eq!(registry.get(&key).unwrap().get("TP53").len(), 1);
        assert_eq!(registry.keys(), vec![key.clone()]);

        registry.remove(&key);
        assert!(registry.get(&key).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_expired() {
        let registry = TableRegistry::new();
        registry.insert(table("genesymbol", "uniprot", Duration::ZERO));
        registry.insert(table("uniprot", "genesymbol", Duration::from_secs(3600)));

        let removed = registry.remove_expired(Instant::now(), Duration::from_secs(60));
        assert_eq!(removed, vec![MappingTableKey::new("genesymbol", "uniprot", 9606)]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failed_keys_expire_and_clear_on_insert() {
        let registry = TableRegistry::new();
        let key = MappingTableKey::new("genesymbol", "uniprot", 9606);

        registry.mark_failed(key.clone());
        assert!(registry.is_failed(&key));

        registry.remove_expired(Instant::now() + Duration::from_secs(120), Duration::from_secs(60));
        assert!(!registry.is_failed(&key));

        registry.mark_failed(key.clone());
        registry.insert(table("genesymbol", "uniprot", Duration::from_secs(60)));
        assert!(!registry.is_failed(&key));
    }
}
