//! Report generation pipeline.
//!
//! configuration -> connector (per source, tagged, concatenated) -> filters
//! -> grouping or projection -> sorter -> columns -> [`GeneratedReport`].
//!
//! The pipeline is synchronous and holds no state between calls: given the
//! same configuration and the same stored records it produces the same rows
//! and columns. Only the report id and timestamp differ between runs.

pub mod coerce;
pub mod columns;
pub mod filter;
pub mod format;
pub mod grouping;
pub mod path;
pub mod projection;
pub mod sort;
pub mod validation;

pub use columns::build_columns;
pub use filter::{apply_all, evaluate};
pub use format::Formatter;
pub use grouping::group;
pub use projection::project;
pub use sort::sort;
pub use validation::{validate, ValidationResult, Validator};

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::{ReportError, Result};
use crate::models::{GeneratedReport, ReportConfiguration, ReportRow, Role, Scope};
use crate::sources::{RecordStore, SourceConnector};

// ---------------------------------------------------------------------------
// ReportGenerator
// ---------------------------------------------------------------------------

/// Report Assembler bound to a record store and a formatter.
pub struct ReportGenerator<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    formatter: &'a Formatter,
}

impl<'a, S: RecordStore + ?Sized> ReportGenerator<'a, S> {
    pub fn new(store: &'a S, formatter: &'a Formatter) -> Self {
        Self { store, formatter }
    }

    /// Run the full pipeline for the acting user and package the result.
    ///
    /// Fails with [`ReportError::ConfigurationInvalid`] before touching any
    /// data when the configuration lacks sources or fields, or groups by
    /// nothing.
    pub fn generate(
        &self,
        config: &ReportConfiguration,
        user_id: &str,
        role: Role,
    ) -> Result<GeneratedReport> {
        let errors = validation::required_errors(config);
        if !errors.is_empty() {
            return Err(ReportError::ConfigurationInvalid(errors));
        }

        let scope = Scope::new(user_id, role);
        let data = self.rows(config, &scope)?;
        let columns = build_columns(&config.fields);
        let generated_at = Utc::now();

        Ok(GeneratedReport {
            id: report_id(&generated_at),
            config: config.clone(),
            row_count: data.len(),
            data,
            columns,
            generated_at,
            generated_by: user_id.to_string(),
        })
    }

    /// Fetch, filter, group or project, then sort.
    pub fn rows(&self, config: &ReportConfiguration, scope: &Scope) -> Result<Vec<ReportRow>> {
        let records = SourceConnector::new(self.store).fetch_all(&config.data_sources, scope)?;
        let fetched = records.len();

        let records = apply_all(records, &config.filters);
        tracing::debug!(fetched, kept = records.len(), "applied report filters");

        let rows = match &config.grouping {
            Some(grouping) => group(&records, grouping),
            None => project(&records, &config.fields, self.formatter),
        };
        tracing::debug!(
            rows = rows.len(),
            grouped = config.grouping.is_some(),
            "built report rows"
        );

        Ok(sort(rows, config.sorting.as_deref().unwrap_or_default()))
    }
}

/// A fresh report id: `report_{millis}_{random suffix}`.
pub fn report_id(generated_at: &DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!(
        "report_{}_{}",
        generated_at.timestamp_millis(),
        suffix.to_lowercase()
    )
}
