use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::field::FieldType;
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// FilterOperator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Between,
    In,
    IsNull,
    IsNotNull,
}

const TEXT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::Contains,
    FilterOperator::NotContains,
    FilterOperator::StartsWith,
    FilterOperator::EndsWith,
    FilterOperator::In,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const NUMERIC_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::GreaterThan,
    FilterOperator::LessThan,
    FilterOperator::GreaterOrEqual,
    FilterOperator::LessOrEqual,
    FilterOperator::Between,
    FilterOperator::In,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const DATE_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::GreaterThan,
    FilterOperator::LessThan,
    FilterOperator::GreaterOrEqual,
    FilterOperator::LessOrEqual,
    FilterOperator::Between,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

const BOOLEAN_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::IsNull,
    FilterOperator::IsNotNull,
];

/// The operators a filter on a field of type `field_type` may use.
pub fn operators_for(field_type: FieldType) -> &'static [FilterOperator] {
    match field_type {
        FieldType::Text => TEXT_OPERATORS,
        FieldType::Number | FieldType::Currency | FieldType::Percentage => NUMERIC_OPERATORS,
        FieldType::Date => DATE_OPERATORS,
        FieldType::Boolean => BOOLEAN_OPERATORS,
    }
}

impl FilterOperator {
    pub fn valid_for(self, field_type: FieldType) -> bool {
        operators_for(field_type).contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Equals => "equals",
            FilterOperator::NotEquals => "not-equals",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not-contains",
            FilterOperator::StartsWith => "starts-with",
            FilterOperator::EndsWith => "ends-with",
            FilterOperator::GreaterThan => "greater-than",
            FilterOperator::LessThan => "less-than",
            FilterOperator::GreaterOrEqual => "greater-or-equal",
            FilterOperator::LessOrEqual => "less-or-equal",
            FilterOperator::Between => "between",
            FilterOperator::In => "in",
            FilterOperator::IsNull => "is-null",
            FilterOperator::IsNotNull => "is-not-null",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LogicalOperator
// ---------------------------------------------------------------------------

/// Per-rule combinator. Reserved: rules are always combined with AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    #[default]
    #[serde(alias = "AND")]
    And,
    #[serde(alias = "OR")]
    Or,
}

// ---------------------------------------------------------------------------
// FilterRule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRule {
    pub id: String,
    /// Dotted path resolved against each record.
    pub field: String,
    pub field_type: FieldType,
    pub operator: FilterOperator,
    /// A scalar, a `[low, high]` pair for `between`, or an array for `in`.
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub logical_operator: LogicalOperator,
}

impl FilterRule {
    /// Build a rule, rejecting operator/type pairs and value shapes that
    /// cannot be evaluated.
    pub fn new(
        id: &str,
        field: &str,
        field_type: FieldType,
        operator: FilterOperator,
        value: Value,
    ) -> Result<Self> {
        let rule = Self {
            id: id.to_string(),
            field: field.to_string(),
            field_type,
            operator,
            value,
            logical_operator: LogicalOperator::And,
        };
        rule.check()?;
        Ok(rule)
    }

    pub fn with_logical_operator(mut self, logical_operator: LogicalOperator) -> Self {
        self.logical_operator = logical_operator;
        self
    }

    /// Check the operator/type pairing and the value shape.
    pub fn check(&self) -> Result<()> {
        if self.field.trim().is_empty() {
            return Err(ReportError::InvalidFilter(format!(
                "filter '{}' has no field",
                self.id
            )));
        }
        if !self.operator.valid_for(self.field_type) {
            return Err(ReportError::InvalidFilter(format!(
                "operator '{}' is not valid for {} field '{}'",
                self.operator, self.field_type, self.field
            )));
        }
        match self.operator {
            FilterOperator::Between => match &self.value {
                Value::Array(pair) if pair.len() == 2 => Ok(()),
                _ => Err(ReportError::InvalidFilter(format!(
                    "'between' on '{}' requires a [low, high] pair",
                    self.field
                ))),
            },
            FilterOperator::In => match &self.value {
                Value::Array(_) => Ok(()),
                _ => Err(ReportError::InvalidFilter(format!(
                    "'in' on '{}' requires a list of values",
                    self.field
                ))),
            },
            _ => Ok(()),
        }
    }
}
