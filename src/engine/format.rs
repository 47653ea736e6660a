//! Type-directed display formatting.
//!
//! Formatting never fails: `null` and missing values render as the empty
//! string for every type, and a value that does not coerce to the field's
//! type is passed through as text. That makes re-formatting an already
//! formatted value a no-op (`"$1,200.00"` is not numeric, so it is returned
//! unchanged).

use std::fmt::Write;

use chrono::NaiveDate;
use serde_json::Value;

use super::coerce::{as_bool, as_date, as_number, as_text};
use crate::config::FormatSettings;
use crate::models::FieldType;

/// Formats raw record values for display.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    settings: FormatSettings,
}

impl Formatter {
    pub fn new(settings: FormatSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FormatSettings {
        &self.settings
    }

    /// Render `value` as display text for a field of type `field_type`.
    pub fn format(&self, value: Option<&Value>, field_type: FieldType) -> String {
        let value = match value {
            None | Some(Value::Null) => return String::new(),
            Some(v) => v,
        };
        match field_type {
            FieldType::Currency => match as_number(value) {
                Some(n) => self.currency(n),
                None => as_text(value),
            },
            FieldType::Percentage => match as_number(value) {
                Some(n) => format!("{:.1}%", n),
                None => as_text(value),
            },
            FieldType::Number => match as_number(value) {
                Some(n) => self.number(n),
                None => as_text(value),
            },
            FieldType::Date => match as_date(value) {
                Some(d) => self.date(d),
                None => as_text(value),
            },
            FieldType::Boolean => match as_bool(value) {
                Some(true) => self.settings.true_label.clone(),
                Some(false) => self.settings.false_label.clone(),
                None => as_text(value),
            },
            FieldType::Text => as_text(value),
        }
    }

    /// Short date in the configured pattern. A pattern chrono cannot render
    /// falls back to ISO `YYYY-MM-DD`.
    pub fn date(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if write!(out, "{}", date.format(&self.settings.date_format)).is_err() {
            return date.format("%Y-%m-%d").to_string();
        }
        out
    }

    /// Currency symbol, grouped thousands, fixed decimals. Negative amounts
    /// put the sign before the symbol.
    pub fn currency(&self, amount: f64) -> String {
        let body = self.grouped(amount.abs(), self.settings.currency_decimals);
        let sign = if amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
            "-"
        } else {
            ""
        };
        format!("{}{}{}", sign, self.settings.currency_symbol, body)
    }

    /// Grouped thousands with up to three fractional digits, trailing zeros
    /// dropped.
    pub fn number(&self, n: f64) -> String {
        let body = self.grouped(n.abs(), 3);
        let separator = self.decimal_separator();
        let body = match body.rsplit_once(separator) {
            Some((int, frac)) => {
                let frac = frac.trim_end_matches('0');
                if frac.is_empty() {
                    int.to_string()
                } else {
                    format!("{}{}{}", int, separator, frac)
                }
            }
            None => body,
        };
        if n < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
            format!("-{}", body)
        } else {
            body
        }
    }

    fn grouped(&self, n: f64, decimals: usize) -> String {
        let fixed = format!("{:.*}", decimals, n);
        let (integer, fraction) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let digits: Vec<char> = integer.chars().collect();
        let mut out = String::with_capacity(fixed.len() + digits.len() / 3);
        for (i, c) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push_str(&self.settings.thousands_separator);
            }
            out.push(*c);
        }

        if let Some(f) = fraction {
            out.push_str(self.decimal_separator());
            out.push_str(f);
        }
        out
    }

    /// The configured decimal separator, or `.` when it is empty.
    fn decimal_separator(&self) -> &str {
        match self.settings.decimal_separator.as_str() {
            "" => ".",
            sep => sep,
        }
    }
}
