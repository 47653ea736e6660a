//! Column Builder.

use crate::models::{ColumnAlign, FieldType, ReportColumn, SelectedField};

/// Column metadata for the selected fields, in field order.
///
/// Numbers and currency align right; everything else aligns left.
pub fn build_columns(fields: &[SelectedField]) -> Vec<ReportColumn> {
    fields
        .iter()
        .map(|field| ReportColumn {
            id: field.id.clone(),
            label: field.label.clone(),
            field_type: field.field_type,
            align: match field.field_type {
                FieldType::Number | FieldType::Currency => ColumnAlign::Right,
                _ => ColumnAlign::Left,
            },
        })
        .collect()
}
