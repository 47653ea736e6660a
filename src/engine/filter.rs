//! Filter Evaluator and Filter Set.
//!
//! A rule whose field is missing (or `null`) on a record only matches
//! `is-null`; every other operator rejects it.

use std::cmp::Ordering;

use serde_json::Value;

use super::coerce::{as_bool, as_date, as_number, as_text, strict_eq};
use super::path;
use crate::models::{FieldType, FilterOperator, FilterRule};

/// Evaluate one rule against one record.
pub fn evaluate(record: &Value, rule: &FilterRule) -> bool {
    let value = path::resolve_present(record, &rule.field);
    match rule.operator {
        FilterOperator::IsNull => value.is_none(),
        FilterOperator::IsNotNull => value.is_some(),
        _ => match value {
            Some(v) => matches_value(v, rule),
            None => false,
        },
    }
}

/// Keep the records matching every rule.
///
/// Rules are always combined with AND; a rule's `logical_operator` is not
/// consulted.
pub fn apply_all(records: Vec<Value>, rules: &[FilterRule]) -> Vec<Value> {
    if rules.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| rules.iter().all(|rule| evaluate(record, rule)))
        .collect()
}

fn matches_value(value: &Value, rule: &FilterRule) -> bool {
    let target = &rule.value;
    match rule.operator {
        FilterOperator::Equals => equals(value, target, rule.field_type),
        FilterOperator::NotEquals => !equals(value, target, rule.field_type),
        FilterOperator::Contains => lower(value).contains(&lower(target)),
        FilterOperator::NotContains => !lower(value).contains(&lower(target)),
        FilterOperator::StartsWith => lower(value).starts_with(&lower(target)),
        FilterOperator::EndsWith => lower(value).ends_with(&lower(target)),
        FilterOperator::GreaterThan => {
            ordering(value, target, rule.field_type) == Some(Ordering::Greater)
        }
        FilterOperator::LessThan => ordering(value, target, rule.field_type) == Some(Ordering::Less),
        FilterOperator::GreaterOrEqual => matches!(
            ordering(value, target, rule.field_type),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOperator::LessOrEqual => matches!(
            ordering(value, target, rule.field_type),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOperator::Between => match target.as_array().map(Vec::as_slice) {
            Some([low, high]) => {
                matches!(
                    ordering(value, low, rule.field_type),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(
                    ordering(value, high, rule.field_type),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }
            _ => false,
        },
        FilterOperator::In => match target.as_array() {
            Some(set) => set.iter().any(|candidate| strict_eq(value, candidate)),
            None => false,
        },
        // Handled before the value is inspected.
        FilterOperator::IsNull | FilterOperator::IsNotNull => false,
    }
}

fn lower(value: &Value) -> String {
    as_text(value).to_lowercase()
}

fn equals(value: &Value, target: &Value, field_type: FieldType) -> bool {
    match field_type {
        FieldType::Number | FieldType::Currency | FieldType::Percentage => {
            match (as_number(value), as_number(target)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        FieldType::Date => match (as_date(value), as_date(target)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        FieldType::Boolean => match (as_bool(value), as_bool(target)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        FieldType::Text => as_text(value) == as_text(target),
    }
}

/// Order `value` against `target`: by calendar date for date fields,
/// numerically otherwise. `None` when either side does not coerce.
fn ordering(value: &Value, target: &Value, field_type: FieldType) -> Option<Ordering> {
    if field_type == FieldType::Date {
        return Some(as_date(value)?.cmp(&as_date(target)?));
    }
    as_number(value)?.partial_cmp(&as_number(target)?)
}
