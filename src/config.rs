use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::models::DataSource;

/// Separator joining group-by values into one composite bucket key.
/// ASCII unit separator, which does not occur in user-entered text.
pub const GROUP_KEY_SEPARATOR: char = '\u{1f}';

/// Key added to every fetched record naming the source it came from.
pub const SOURCE_TAG: &str = "_source";

/// Name of the DuckDB file used when a data directory (not a file) is given.
pub const DATABASE_FILE: &str = "records.duckdb";

/// Record field naming the agent who owns the record. Agents only see
/// records whose owner field equals their user id.
pub const OWNER_FIELD: &str = "agentId";

/// Record-store table backing a built-in source.
pub fn table_name(source: &DataSource) -> Option<&'static str> {
    match source {
        DataSource::Deals => Some("deal_records"),
        DataSource::Properties => Some("property_records"),
        DataSource::Expenses => Some("expense_records"),
        DataSource::Commissions => Some("commission_records"),
        DataSource::Other(_) => None,
    }
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("agency-reports")
    } else {
        PathBuf::from(".agency-reports")
    }
}

// ---------------------------------------------------------------------------
// FormatSettings: Display conventions
// ---------------------------------------------------------------------------

/// Display conventions applied by the formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatSettings {
    pub currency_symbol: String,
    pub currency_decimals: usize,
    pub thousands_separator: String,
    pub decimal_separator: String,
    /// `chrono` strftime pattern for short dates.
    pub date_format: String,
    pub true_label: String,
    pub false_label: String,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            date_format: "%m/%d/%Y".to_string(),
            true_label: "Yes".to_string(),
            false_label: "No".to_string(),
        }
    }
}

impl FormatSettings {
    /// Load settings from a JSON file. Missing keys keep their defaults.
    ///
    /// Fails with [`ReportError::InvalidArgument`] when the loaded settings
    /// do not pass [`check`](Self::check).
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.check()?;
        Ok(settings)
    }

    /// Reject a date pattern chrono cannot render, and a decimal separator
    /// that is empty or equal to the thousands separator.
    pub fn check(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ReportError::InvalidArgument(format!(
                "invalid date format '{}'",
                self.date_format
            )));
        }
        if self.decimal_separator.is_empty() {
            return Err(ReportError::InvalidArgument(
                "decimal separator must not be empty".into(),
            ));
        }
        if self.decimal_separator == self.thousands_separator {
            return Err(ReportError::InvalidArgument(format!(
                "decimal separator '{}' equals the thousands separator",
                self.decimal_separator
            )));
        }
        Ok(())
    }
}
