//! Configuration validation.
//!
//! [`validate`] checks a configuration on its own; [`Validator`] can also
//! check every referenced path against a [`FieldCatalog`], catching typos
//! before any record is read.

use serde::{Deserialize, Serialize};

use crate::catalog::FieldCatalog;
use crate::config::SOURCE_TAG;
use crate::error::{ReportError, Result};
use crate::models::{AggregationFunction, ReportConfiguration};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// `Err(ConfigurationInvalid)` carrying every message when invalid.
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(ReportError::ConfigurationInvalid(self.errors))
        }
    }
}

/// The minimum a configuration needs before it can run: a source, a field,
/// and a non-empty group-by list when grouping is present.
pub fn required_errors(config: &ReportConfiguration) -> Vec<String> {
    let mut errors = Vec::new();
    if config.data_sources.is_empty() {
        errors.push("At least one data source is required".to_string());
    }
    if config.fields.is_empty() {
        errors.push("At least one field must be selected".to_string());
    }
    if let Some(grouping) = &config.grouping {
        if grouping.group_by.is_empty() {
            errors.push("Grouping requires at least one group-by field".to_string());
        }
    }
    errors
}

/// Validate a configuration without consulting a catalog.
pub fn validate(config: &ReportConfiguration) -> ValidationResult {
    Validator::new().validate(config)
}

/// Configuration validator, optionally catalog-aware.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator<'a> {
    catalog: Option<&'a FieldCatalog>,
}

impl<'a> Validator<'a> {
    pub fn new() -> Self {
        Self { catalog: None }
    }

    pub fn with_catalog(catalog: &'a FieldCatalog) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    pub fn validate(&self, config: &ReportConfiguration) -> ValidationResult {
        let mut errors = required_errors(config);
        structural_errors(config, &mut errors);
        if let Some(catalog) = self.catalog {
            catalog_errors(config, catalog, &mut errors);
        }
        ValidationResult::from_errors(errors)
    }
}

fn structural_errors(config: &ReportConfiguration, errors: &mut Vec<String>) {
    for rule in &config.filters {
        if let Err(ReportError::InvalidFilter(msg)) = rule.check() {
            errors.push(format!("Filter '{}': {}", rule.id, msg));
        }
    }
    if let Some(grouping) = &config.grouping {
        for agg in &grouping.aggregations {
            if agg.label.trim().is_empty() {
                errors.push(format!(
                    "Aggregation {} of '{}' needs a label",
                    agg.function, agg.field
                ));
            }
        }
    }
    if let Some(sorting) = &config.sorting {
        if sorting.iter().any(|rule| rule.field.trim().is_empty()) {
            errors.push("Sort rules must name a field".to_string());
        }
    }
}

fn catalog_errors(config: &ReportConfiguration, catalog: &FieldCatalog, errors: &mut Vec<String>) {
    let sources = &config.data_sources;

    for field in &config.fields {
        if !sources.contains(&field.source) {
            errors.push(format!(
                "Field '{}' reads from source '{}', which is not selected",
                field.id, field.source
            ));
        } else if catalog.field(&field.source, &field.path).is_none() {
            errors.push(format!(
                "Unknown field '{}' on source '{}'",
                field.path, field.source
            ));
        }
    }

    for rule in &config.filters {
        if rule.field != SOURCE_TAG && catalog.find_in(sources, &rule.field).is_none() {
            errors.push(format!("Filter '{}' uses unknown field '{}'", rule.id, rule.field));
        }
    }

    if let Some(grouping) = &config.grouping {
        for path in &grouping.group_by {
            match catalog.find_in(sources, path) {
                None => errors.push(format!("Cannot group by unknown field '{}'", path)),
                Some(f) if !f.allow_grouping => {
                    errors.push(format!("Field '{}' does not support grouping", path))
                }
                Some(_) => {}
            }
        }
        for agg in &grouping.aggregations {
            match catalog.find_in(sources, &agg.field) {
                None => errors.push(format!("Cannot aggregate unknown field '{}'", agg.field)),
                Some(f) if !f.allow_aggregation && agg.function != AggregationFunction::Count => {
                    errors.push(format!("Field '{}' does not support aggregation", agg.field))
                }
                Some(_) => {}
            }
        }
    }
}
