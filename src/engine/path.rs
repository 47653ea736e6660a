//! Dotted-path field access into raw records.

use serde_json::Value;

/// Resolve a dotted path such as `financial.agreedPrice` against a record.
///
/// Returns `None` when any segment is missing or an intermediate value is
/// not an object. A present JSON `null` resolves to `Some(&Value::Null)`.
pub fn resolve<'v>(record: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.')
        .try_fold(record, |current, segment| current.as_object()?.get(segment))
}

/// Resolve a path, mapping missing and `null` to `None`.
pub fn resolve_present<'v>(record: &'v Value, path: &str) -> Option<&'v Value> {
    resolve(record, path).filter(|v| !v.is_null())
}
