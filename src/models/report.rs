use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::field::{FieldType, SelectedField};
use super::filter::FilterRule;
use super::source::DataSource;

// ---------------------------------------------------------------------------
// Grouping: Group-by paths plus aggregation specs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationFunction {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl AggregationFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationFunction::Sum => "sum",
            AggregationFunction::Avg => "avg",
            AggregationFunction::Count => "count",
            AggregationFunction::Min => "min",
            AggregationFunction::Max => "max",
        }
    }
}

impl fmt::Display for AggregationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reduction over a field within each group. The result is keyed by
/// `label` in the output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub field: String,
    pub function: AggregationFunction,
    pub label: String,
}

impl Aggregation {
    pub fn new(field: &str, function: AggregationFunction, label: &str) -> Self {
        Self {
            field: field.to_string(),
            function,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupingConfig {
    pub group_by: Vec<String>,
    #[serde(default)]
    pub aggregations: Vec<Aggregation>,
}

impl GroupingConfig {
    pub fn new(group_by: &[&str]) -> Self {
        Self {
            group_by: group_by.iter().map(|p| p.to_string()).collect(),
            aggregations: Vec::new(),
        }
    }

    pub fn aggregate(mut self, field: &str, function: AggregationFunction, label: &str) -> Self {
        self.aggregations.push(Aggregation::new(field, function, label));
        self
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortRule {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortRule {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

// ---------------------------------------------------------------------------
// ReportConfiguration: Declarative report input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfiguration {
    pub data_sources: Vec<DataSource>,
    pub fields: Vec<SelectedField>,
    #[serde(default)]
    pub filters: Vec<FilterRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<GroupingConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<Vec<SortRule>>,
}

impl ReportConfiguration {
    pub fn new(data_sources: Vec<DataSource>, fields: Vec<SelectedField>) -> Self {
        Self {
            data_sources,
            fields,
            ..Default::default()
        }
    }

    pub fn filter(mut self, rule: FilterRule) -> Self {
        self.filters.push(rule);
        self
    }

    pub fn grouping(mut self, grouping: GroupingConfig) -> Self {
        self.grouping = Some(grouping);
        self
    }

    pub fn sort(mut self, rule: SortRule) -> Self {
        self.sorting.get_or_insert_with(Vec::new).push(rule);
        self
    }
}

// ---------------------------------------------------------------------------
// ReportRow: One line of output
// ---------------------------------------------------------------------------

/// One output row: output key (field id, group-by path or aggregation label)
/// to display value.
///
/// Projected rows also remember the unformatted value behind each cell,
/// keyed by field id and by record path, so sorting orders by value rather
/// than by display text. Only the display values are serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportRow {
    values: Map<String, Value>,
    #[serde(skip)]
    raw: Map<String, Value>,
    #[serde(skip)]
    by_path: Map<String, Value>,
}

impl ReportRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    /// Insert a display value together with the value it was formatted from.
    pub fn insert_formatted(&mut self, key: &str, display: Value, raw: Value) {
        self.values.insert(key.to_string(), display);
        self.raw.insert(key.to_string(), raw);
    }

    /// Remember the value a record held at `path`. The first value recorded
    /// for a path wins.
    pub fn insert_path_value(&mut self, path: &str, raw: Value) {
        self.by_path.entry(path.to_string()).or_insert(raw);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The value to order by. `key` is matched as an output key first (the
    /// unformatted value when known), then as a record path.
    pub fn sort_value(&self, key: &str) -> Option<&Value> {
        self.raw
            .get(key)
            .or_else(|| self.values.get(key))
            .or_else(|| self.by_path.get(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ReportColumn
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnAlign {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportColumn {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub align: ColumnAlign,
}

// ---------------------------------------------------------------------------
// GeneratedReport: Immutable result snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    pub id: String,
    pub config: ReportConfiguration,
    pub data: Vec<ReportRow>,
    pub columns: Vec<ReportColumn>,
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
    pub row_count: usize,
}
