//! Data Source Connector.
//!
//! Pulls role-scoped raw records for each configured source from a
//! [`RecordStore`] and tags every record with the source it came from.
//! Multiple sources are concatenated in configuration order, never joined.

pub mod memory;

pub use memory::MemoryStore;

use serde_json::Value;

use crate::config::SOURCE_TAG;
use crate::error::Result;
use crate::models::{DataSource, Scope};

/// Backing storage for raw records.
///
/// Implementations return the records of `source` visible in `scope`, in a
/// stable order, or an empty list when nothing is stored for the source.
pub trait RecordStore {
    fn load(&self, source: &DataSource, scope: &Scope) -> Result<Vec<Value>>;
}

// ---------------------------------------------------------------------------
// SourceConnector
// ---------------------------------------------------------------------------

/// Fetches and tags records for the sources a report reads from.
pub struct SourceConnector<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> SourceConnector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch the records of one source visible in `scope`.
    ///
    /// Every returned record is a JSON object carrying a `_source` key.
    /// Unknown sources are logged and yield no records. Records that are not
    /// JSON objects are skipped.
    pub fn fetch(&self, source: &DataSource, scope: &Scope) -> Result<Vec<Value>> {
        if !source.is_built_in() {
            tracing::warn!(source = %source, "unknown data source; no records fetched");
            return Ok(Vec::new());
        }

        let raw = self.store.load(source, scope)?;
        let mut tagged = Vec::with_capacity(raw.len());
        for record in raw {
            match record {
                Value::Object(mut map) => {
                    map.insert(SOURCE_TAG.to_string(), Value::String(source.to_string()));
                    tagged.push(Value::Object(map));
                }
                other => {
                    tracing::debug!(source = %source, record = %other, "skipping non-object record");
                }
            }
        }
        Ok(tagged)
    }

    /// Fetch every listed source and concatenate the results in list order.
    pub fn fetch_all(&self, sources: &[DataSource], scope: &Scope) -> Result<Vec<Value>> {
        let mut records = Vec::new();
        for source in sources {
            records.extend(self.fetch(source, scope)?);
        }
        Ok(records)
    }
}

/// The source a fetched record was tagged with.
pub fn record_source(record: &Value) -> Option<DataSource> {
    record
        .get(SOURCE_TAG)
        .and_then(|v| v.as_str())
        .map(DataSource::from)
}
