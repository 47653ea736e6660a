//! Field Projector: one output row per record when no grouping is requested.

use serde_json::Value;

use super::format::Formatter;
use super::path;
use crate::models::{ReportRow, SelectedField};
use crate::sources::record_source;

/// Project the selected fields out of each record and format them.
///
/// Rows are keyed by field id, and also remember each resolved value under
/// its record path for sorting. A field bound to a different source than the
/// record it is read from resolves to nothing, so concatenated sources never
/// leak values into each other's columns.
pub fn project(records: &[Value], fields: &[SelectedField], formatter: &Formatter) -> Vec<ReportRow> {
    records
        .iter()
        .map(|record| {
            let origin = record_source(record);
            let mut row = ReportRow::new();
            for field in fields {
                let raw = match &origin {
                    Some(source) if *source != field.source => None,
                    _ => path::resolve(record, &field.path),
                };
                let display = formatter.format(raw, field.field_type);
                if let Some(value) = raw {
                    row.insert_path_value(&field.path, value.clone());
                }
                row.insert_formatted(
                    &field.id,
                    Value::String(display),
                    raw.cloned().unwrap_or(Value::Null),
                );
            }
            row
        })
        .collect()
}
