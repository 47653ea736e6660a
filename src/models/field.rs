use serde::{Deserialize, Serialize};
use std::fmt;

use super::source::DataSource;

// ---------------------------------------------------------------------------
// FieldType: Declared value type of a field
// ---------------------------------------------------------------------------

/// Declared type of a field. Drives filter operator validity, display
/// formatting and column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Currency,
    Percentage,
    Date,
    Boolean,
}

impl FieldType {
    /// Number, currency and percentage fields hold numeric values.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldType::Number | FieldType::Currency | FieldType::Percentage
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Percentage => "percentage",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AvailableField: Field Catalog entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableField {
    pub id: String,
    pub source: DataSource,
    /// Dotted access path into the raw record, e.g. `financial.agreedPrice`.
    pub path: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub allow_grouping: bool,
    pub allow_aggregation: bool,
}

impl AvailableField {
    /// Build a catalog entry whose id is `{source}.{path}`.
    pub fn new(source: DataSource, path: &str, label: &str, field_type: FieldType) -> Self {
        Self {
            id: format!("{}.{}", source, path),
            source,
            path: path.to_string(),
            label: label.to_string(),
            field_type,
            allow_grouping: false,
            allow_aggregation: false,
        }
    }

    pub fn groupable(mut self) -> Self {
        self.allow_grouping = true;
        self
    }

    pub fn aggregatable(mut self) -> Self {
        self.allow_aggregation = true;
        self
    }

    /// Select this field for output.
    pub fn to_selected(&self) -> SelectedField {
        SelectedField {
            id: self.id.clone(),
            source: self.source.clone(),
            path: self.path.clone(),
            label: self.label.clone(),
            field_type: self.field_type,
        }
    }
}

// ---------------------------------------------------------------------------
// SelectedField: A field chosen for output
// ---------------------------------------------------------------------------

/// A field chosen for output. Its position in the configuration's field list
/// is its output column position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedField {
    pub id: String,
    pub source: DataSource,
    pub path: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl SelectedField {
    pub fn new(
        id: &str,
        source: DataSource,
        path: &str,
        label: &str,
        field_type: FieldType,
    ) -> Self {
        Self {
            id: id.to_string(),
            source,
            path: path.to_string(),
            label: label.to_string(),
            field_type,
        }
    }
}
