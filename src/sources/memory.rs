//! In-process record store.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::OWNER_FIELD;
use crate::error::Result;
use crate::models::{DataSource, Scope};
use crate::sources::RecordStore;

/// Holds records in memory, keyed by source, in insertion order.
///
/// Applies the same role scoping as the DuckDB store: agents only see
/// records whose owner field equals their user id.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<DataSource, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: DataSource, record: Value) {
        self.records.entry(source).or_default().push(record);
    }

    pub fn extend<I: IntoIterator<Item = Value>>(&mut self, source: DataSource, records: I) {
        self.records.entry(source).or_default().extend(records);
    }

    /// Builder-style variant of [`extend`](Self::extend).
    pub fn with_records<I: IntoIterator<Item = Value>>(mut self, source: DataSource, records: I) -> Self {
        self.extend(source, records);
        self
    }

    pub fn count(&self, source: &DataSource) -> usize {
        self.records.get(source).map(Vec::len).unwrap_or(0)
    }

    pub fn clear(&mut self, source: &DataSource) {
        self.records.remove(source);
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, source: &DataSource, scope: &Scope) -> Result<Vec<Value>> {
        let Some(records) = self.records.get(source) else {
            return Ok(Vec::new());
        };
        Ok(records
            .iter()
            .filter(|r| scope.can_see(r.get(OWNER_FIELD).and_then(|v| v.as_str())))
            .cloned()
            .collect())
    }
}
