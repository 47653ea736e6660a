//! Grouping & Aggregation Engine.
//!
//! Records are bucketed by the text of their group-by values, buckets keep
//! first-seen order, and each bucket becomes one output row holding the
//! group-by values plus one computed value per aggregation.

use std::collections::HashMap;

use serde_json::Value;

use super::coerce::{as_number, as_text, number_value};
use super::path;
use crate::config::GROUP_KEY_SEPARATOR;
use crate::models::{AggregationFunction, GroupingConfig, ReportRow};

// ---------------------------------------------------------------------------
// Accumulator
// ---------------------------------------------------------------------------

/// Running state for one aggregation over one bucket.
///
/// Only numeric values feed sum/avg/min/max; anything else is skipped.
/// `count` counts records, numeric or not.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    pub count: u64,
    pub numeric_count: u64,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: Option<&Value>) {
        self.count += 1;
        let Some(n) = value.and_then(as_number) else {
            return;
        };
        self.numeric_count += 1;
        self.sum += n;
        self.min = Some(self.min.map_or(n, |m| m.min(n)));
        self.max = Some(self.max.map_or(n, |m| m.max(n)));
    }

    /// Final value. `avg`, `min` and `max` are `0` when the bucket holds no
    /// numeric values.
    pub fn compute(&self, function: AggregationFunction) -> f64 {
        match function {
            AggregationFunction::Sum => self.sum,
            AggregationFunction::Count => self.count as f64,
            AggregationFunction::Avg => {
                if self.numeric_count > 0 {
                    self.sum / self.numeric_count as f64
                } else {
                    0.0
                }
            }
            AggregationFunction::Min => self.min.unwrap_or(0.0),
            AggregationFunction::Max => self.max.unwrap_or(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// group
// ---------------------------------------------------------------------------

/// Composite bucket key: the text of each group-by value joined by the
/// reserved separator. Missing values contribute an empty segment.
pub fn group_key(record: &Value, group_by: &[String]) -> String {
    let mut key = String::new();
    for (i, field) in group_by.iter().enumerate() {
        if i > 0 {
            key.push(GROUP_KEY_SEPARATOR);
        }
        if let Some(value) = path::resolve(record, field) {
            key.push_str(&as_text(value).replace(GROUP_KEY_SEPARATOR, ""));
        }
    }
    key
}

/// Partition `records` by `config.group_by` and reduce each partition.
///
/// Output rows are keyed by group-by path (text value) and aggregation
/// label (numeric value), in first-seen bucket order.
pub fn group(records: &[Value], config: &GroupingConfig) -> Vec<ReportRow> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<Accumulator>> = HashMap::new();

    for record in records {
        let key = group_key(record, &config.group_by);
        let accumulators = buckets.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            vec![Accumulator::new(); config.aggregations.len()]
        });
        for (acc, agg) in accumulators.iter_mut().zip(&config.aggregations) {
            acc.add(path::resolve(record, &agg.field));
        }
    }

    order
        .into_iter()
        .filter_map(|key| {
            let accumulators = buckets.remove(&key)?;
            let mut row = ReportRow::new();
            for (field, part) in config.group_by.iter().zip(key.split(GROUP_KEY_SEPARATOR)) {
                row.insert(field, Value::String(part.to_string()));
            }
            for (acc, agg) in accumulators.iter().zip(&config.aggregations) {
                row.insert(&agg.label, number_value(acc.compute(agg.function)));
            }
            Some(row)
        })
        .collect()
}
