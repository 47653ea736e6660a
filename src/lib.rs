//! Ad-hoc report generation for agency data.
//!
//! Takes a declarative [`ReportConfiguration`] (data sources, selected
//! fields, filters, optional grouping/aggregation and sort order) and
//! produces a typed, tabular [`GeneratedReport`]. Records are read from a
//! DuckDB-backed [`Connection`] (or any other [`RecordStore`]), scoped to the
//! acting user's role.
//!
//! # Quick start
//!
//! ```no_run
//! use agency_reports::{DataSource, ReportConfiguration, ReportEngine, Role};
//! use serde_json::json;
//!
//! let engine = ReportEngine::builder().build().unwrap();
//! engine
//!     .connection()
//!     .insert_record(&DataSource::Expenses, &json!({"category": "rent", "amount": 1200}))
//!     .unwrap();
//!
//! let fields = engine
//!     .catalog()
//!     .list_fields(&DataSource::Expenses)
//!     .iter()
//!     .map(|f| f.to_selected())
//!     .collect();
//! let config = ReportConfiguration::new(vec![DataSource::Expenses], fields);
//! let report = engine.generate(&config, "admin-1", Role::Admin).unwrap();
//! println!("{} rows", report.row_count);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod catalog;
pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod models;
pub mod sources;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncReportEngine;
pub use catalog::FieldCatalog;
pub use config::FormatSettings;
pub use connection::Connection;
pub use engine::{validate, Formatter, ReportGenerator, ValidationResult, Validator};
pub use error::{ReportError, Result};
pub use models::*;
pub use sources::{MemoryStore, RecordStore, SourceConnector};
pub use sql_builder::SqlBuilder;

use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ReportEngineBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ReportEngine`].
///
/// Use [`ReportEngine::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](ReportEngineBuilder::build).
#[derive(Default)]
pub struct ReportEngineBuilder {
    database_path: Option<PathBuf>,
    catalog: Option<FieldCatalog>,
    format_settings: Option<FormatSettings>,
}

impl ReportEngineBuilder {
    /// Store records in a DuckDB database file instead of in memory.
    pub fn database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Store records in `records.duckdb` under the platform data directory
    /// (e.g. `~/.local/share/agency-reports` on Linux).
    pub fn persistent(self) -> Self {
        let path = config::default_data_dir().join(config::DATABASE_FILE);
        self.database_path(path)
    }

    /// Replace the built-in Field Catalog.
    pub fn catalog(mut self, catalog: FieldCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Override display conventions. Defaults to [`FormatSettings::default`].
    pub fn format_settings(mut self, settings: FormatSettings) -> Self {
        self.format_settings = Some(settings);
        self
    }

    /// Open the record store and build the engine.
    ///
    /// Fails with [`ReportError::InvalidArgument`] when the format settings
    /// do not pass [`FormatSettings::check`].
    pub fn build(self) -> Result<ReportEngine> {
        let settings = self.format_settings.unwrap_or_default();
        settings.check()?;
        let conn = match &self.database_path {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        Ok(ReportEngine {
            conn,
            catalog: self.catalog.unwrap_or_else(FieldCatalog::standard),
            formatter: Formatter::new(settings),
        })
    }
}

// ---------------------------------------------------------------------------
// ReportEngine
// ---------------------------------------------------------------------------

/// The main entry point: a record store, a Field Catalog and a formatter.
///
/// Created via [`ReportEngine::builder()`].
pub struct ReportEngine {
    conn: Connection,
    catalog: FieldCatalog,
    formatter: Formatter,
}

impl ReportEngine {
    /// Create a new builder for configuring the engine.
    pub fn builder() -> ReportEngineBuilder {
        ReportEngineBuilder::default()
    }

    /// Validate `config` against the catalog, then generate the report for
    /// the acting user.
    ///
    /// Fails fast with [`ReportError::ConfigurationInvalid`] before any
    /// record is read.
    pub fn generate(
        &self,
        config: &ReportConfiguration,
        user_id: &str,
        role: Role,
    ) -> Result<GeneratedReport> {
        self.validate(config).into_result()?;
        self.reports().generate(config, user_id, role)
    }

    /// Catalog-aware validation of a configuration.
    pub fn validate(&self, config: &ReportConfiguration) -> ValidationResult {
        Validator::with_catalog(&self.catalog).validate(config)
    }

    /// The bare report assembler over this engine's store, without catalog
    /// validation.
    pub fn reports(&self) -> ReportGenerator<'_, Connection> {
        ReportGenerator::new(&self.conn, &self.formatter)
    }

    /// Fields available on a source. Unknown sources have none.
    pub fn list_fields(&self, source: &DataSource) -> &[AvailableField] {
        self.catalog.list_fields(source)
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// The record store, for loading and inspecting records.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl fmt::Display for ReportEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = match self.conn.path() {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        };
        let sources: Vec<&str> = self.catalog.sources().into_iter().map(DataSource::as_str).collect();
        write!(
            f,
            "ReportEngine(store={}, sources=[{}])",
            store,
            sources.join(", ")
        )
    }
}
