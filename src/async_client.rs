//! Async wrapper around [`ReportEngine`] for use in async runtimes (Tokio,
//! etc.).
//!
//! Report generation is synchronous and CPU-bound; this wrapper runs it on
//! the blocking thread pool via [`tokio::task::spawn_blocking`] so the event
//! loop stays free.
//!
//! # Example
//!
//! ```no_run
//! use agency_reports::{AsyncReportEngine, ReportEngine, Role};
//! # async fn example(config: agency_reports::ReportConfiguration) -> agency_reports::Result<()> {
//! let engine = AsyncReportEngine::new(ReportEngine::builder().build()?);
//! let report = engine.generate(config, "admin-1", Role::Admin).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};

use crate::error::{ReportError, Result};
use crate::models::{GeneratedReport, ReportConfiguration, Role};
use crate::ReportEngine;

/// Async wrapper around [`ReportEngine`].
///
/// The engine is guarded by a [`Mutex`] since the DuckDB connection is not
/// shareable across threads.
#[derive(Clone)]
pub struct AsyncReportEngine {
    inner: Arc<Mutex<ReportEngine>>,
}

impl AsyncReportEngine {
    pub fn new(engine: ReportEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run a sync engine operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ReportEngine) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let engine = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = engine
                .lock()
                .map_err(|_| ReportError::InvalidArgument("engine lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| ReportError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Validate and generate a report asynchronously.
    pub async fn generate(
        &self,
        config: ReportConfiguration,
        user_id: &str,
        role: Role,
    ) -> Result<GeneratedReport> {
        let user_id = user_id.to_string();
        self.run(move |engine| engine.generate(&config, &user_id, role))
            .await
    }
}
