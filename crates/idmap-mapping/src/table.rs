//! In-memory translation tables with usage-based expiry

use crate::key::MappingTableKey;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// One-to-many dictionary from source IDs to target IDs
pub type MappingData = HashMap<String, HashSet<String>>;

/// A directional translation table for one `(id_type, target_id_type, organism)`.
///
/// The dictionary never changes after construction. Only the last-use timestamp
/// moves, so tables are shared as `Arc<MappingTable>` between the registry and
/// callers.
#[derive(Debug)]
pub struct MappingTable {
    data: MappingData,
    id_type: String,
    target_id_type: String,
    ncbi_tax_id: u32,
    lifetime: Duration,
    last_used: Mutex<Instant>,
}

impl MappingTable {
    pub fn new(
        data: MappingData,
        id_type: impl Into<String>,
        target_id_type: impl Into<String>,
        ncbi_tax_id: u32,
        lifetime: Duration,
    ) -> Self {
        Self {
            data,
            id_type: id_type.into(),
            target_id_type: target_id_type.into(),
            ncbi_tax_id,
            lifetime,
            last_used: Mutex::new(Instant::now()),
        }
    }

    /// Targets for `key`, empty when absent. Refreshes the last-use timestamp.
    pub fn get(&self, key: &str) -> HashSet<String> {
        self.touch();
        self.data.get(key).cloned().unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.touch();
        self.data.contains_key(key)
    }

    pub fn touch(&self) {
        *self.last_used.lock() = Instant::now();
    }

    /// `now - last_used > lifetime`; a zero lifetime is always expired.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.lifetime.is_zero()
            || now.saturating_duration_since(*self.last_used.lock()) > self.lifetime
    }

    /// Build the inverse table; every `a -> {b, c}` contributes `b -> {a}` and `c -> {a}`.
    pub fn reverse(&self) -> MappingTable {
        MappingTable::new(
            swap_dict(&self.data),
            self.target_id_type.clone(),
            self.id_type.clone(),
            self.ncbi_tax_id,
            self.lifetime,
        )
    }

    pub fn key(&self) -> MappingTableKey {
        MappingTableKey::new(self.id_type.clone(), self.target_id_type.clone(), self.ncbi_tax_id)
    }

    pub fn data(&self) -> &MappingData {
        &self.data
    }

    pub fn id_type(&self) -> &str {
        &self.id_type
    }

    pub fn target_id_type(&self) -> &str {
        &self.target_id_type
    }

    pub fn ncbi_tax_id(&self) -> u32 {
        self.ncbi_tax_id
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub fn swap_dict(data: &MappingData) -> MappingData {
    let mut swapped: MappingData = HashMap::new();
    for (key, values) in data {
        for value in values {
            swapped
                .entry(value.clone())
                .or_default()
                .insert(key.clone());
        }
    }
    swapped
}
