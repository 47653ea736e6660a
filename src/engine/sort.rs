//! Multi-key stable sorter.

use std::cmp::Ordering;

use super::coerce::compare_values;
use crate::models::{ReportRow, SortDirection, SortRule};

/// Sort rows by each rule in turn; the first rule on which two rows differ
/// decides. Rows equal on every rule keep their relative order.
///
/// A rule names an output key (field id, group-by path or aggregation
/// label) or a record path. By path, rows drawn from different sources each
/// sort on their own value for that path.
pub fn sort(mut rows: Vec<ReportRow>, rules: &[SortRule]) -> Vec<ReportRow> {
    if rules.is_empty() {
        return rows;
    }
    rows.sort_by(|a, b| compare_rows(a, b, rules));
    rows
}

pub fn compare_rows(a: &ReportRow, b: &ReportRow, rules: &[SortRule]) -> Ordering {
    for rule in rules {
        let ord = compare_values(a.sort_value(&rule.field), b.sort_value(&rule.field));
        let ord = match rule.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
