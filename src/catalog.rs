//! Field Catalog: the registry of fields each data source exposes.
//!
//! The catalog is built once and handed to the components that need it
//! (validation, the report engine). Unknown sources simply have no fields.

use std::collections::BTreeMap;

use crate::models::{AvailableField, DataSource, FieldType};

/// Read-only registry mapping a data source to its available fields.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: BTreeMap<DataSource, Vec<AvailableField>>,
}

impl FieldCatalog {
    /// A catalog with no sources registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalog for the built-in agency sources.
    pub fn standard() -> Self {
        let mut catalog = Self::empty();
        catalog.register(deal_fields());
        catalog.register(property_fields());
        catalog.register(expense_fields());
        catalog.register(commission_fields());
        catalog
    }

    /// Add fields to the catalog, each under its own `source`.
    ///
    /// A field whose path is already registered for its source replaces the
    /// earlier entry in place.
    pub fn register(&mut self, fields: Vec<AvailableField>) {
        for field in fields {
            let entries = self.fields.entry(field.source.clone()).or_default();
            match entries.iter_mut().find(|f| f.path == field.path) {
                Some(existing) => *existing = field,
                None => entries.push(field),
            }
        }
    }

    /// Fields available on `source`, in registration order. Unknown sources
    /// return an empty list.
    pub fn list_fields(&self, source: &DataSource) -> &[AvailableField] {
        self.fields.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up one field by its dotted path.
    pub fn field(&self, source: &DataSource, path: &str) -> Option<&AvailableField> {
        self.list_fields(source).iter().find(|f| f.path == path)
    }

    /// Look up a path on any of the given sources, first match wins.
    pub fn find_in(&self, sources: &[DataSource], path: &str) -> Option<&AvailableField> {
        sources.iter().find_map(|s| self.field(s, path))
    }

    pub fn groupable_fields(&self, source: &DataSource) -> Vec<&AvailableField> {
        self.list_fields(source)
            .iter()
            .filter(|f| f.allow_grouping)
            .collect()
    }

    pub fn aggregatable_fields(&self, source: &DataSource) -> Vec<&AvailableField> {
        self.list_fields(source)
            .iter()
            .filter(|f| f.allow_aggregation)
            .collect()
    }

    /// Registered sources, in sorted order.
    pub fn sources(&self) -> Vec<&DataSource> {
        self.fields.keys().collect()
    }
}

// ---------------------------------------------------------------------------
// Built-in source fields
// ---------------------------------------------------------------------------

fn deal_fields() -> Vec<AvailableField> {
    let src = DataSource::Deals;
    vec![
        AvailableField::new(src.clone(), "id", "Deal ID", FieldType::Text),
        AvailableField::new(src.clone(), "title", "Deal", FieldType::Text),
        AvailableField::new(src.clone(), "status", "Status", FieldType::Text).groupable(),
        AvailableField::new(src.clone(), "stage", "Stage", FieldType::Text).groupable(),
        AvailableField::new(src.clone(), "agentId", "Agent", FieldType::Text).groupable(),
        AvailableField::new(src.clone(), "clientName", "Client", FieldType::Text),
        AvailableField::new(src.clone(), "propertyId", "Property", FieldType::Text),
        AvailableField::new(
            src.clone(),
            "financial.agreedPrice",
            "Agreed Price",
            FieldType::Currency,
        )
        .aggregatable(),
        AvailableField::new(
            src.clone(),
            "financial.commissionRate",
            "Commission Rate",
            FieldType::Percentage,
        )
        .aggregatable(),
        AvailableField::new(
            src.clone(),
            "financial.depositPaid",
            "Deposit Paid",
            FieldType::Boolean,
        )
        .groupable(),
        AvailableField::new(src.clone(), "createdAt", "Created", FieldType::Date).groupable(),
        AvailableField::new(src, "closingDate", "Closing Date", FieldType::Date),
    ]
}

fn property_fields() -> Vec<AvailableField> {
    let src = DataSource::Properties;
    vec![
        AvailableField::new(src.clone(), "id", "Property ID", FieldType::Text),
        AvailableField::new(src.clone(), "title", "Property", FieldType::Text),
        AvailableField::new(src.clone(), "type", "Type", FieldType::Text).groupable(),
        AvailableField::new(src.clone(), "status", "Status", FieldType::Text).groupable(),
        AvailableField::new(src.clone(), "agentId", "Agent", FieldType::Text).groupable(),
        AvailableField::new(src.clone(), "location.city", "City", FieldType::Text).groupable(),
        AvailableField::new(src.clone(), "location.district", "District", FieldType::Text)
            .groupable(),
        AvailableField::new(src.clone(), "price", "Price", FieldType::Currency).aggregatable(),
        AvailableField::new(src.clone(), "bedrooms", "Bedrooms", FieldType::Number)
            .groupable()
            .aggregatable(),
        AvailableField::new(src.clone(), "area", "Area (sq m)", FieldType::Number).aggregatable(),
        AvailableField::new(src.clone(), "furnished", "Furnished", FieldType::Boolean).groupable(),
        AvailableField::new(src, "listedAt", "Listed", FieldType::Date),
    ]
}

fn expense_fields() -> Vec<AvailableField> {
    let src = DataSource::Expenses;
    vec![
        AvailableField::new(src.clone(), "id", "Expense ID", FieldType::Text),
        AvailableField::new(src.clone(), "description", "Description", FieldType::Text),
        AvailableField::new(src.clone(), "category", "Category", FieldType::Text).groupable(),
        AvailableField::new(src.clone(), "amount", "Amount", FieldType::Currency).aggregatable(),
        AvailableField::new(src.clone(), "date", "Date", FieldType::Date).groupable(),
        AvailableField::new(src.clone(), "paymentMethod", "Payment Method", FieldType::Text)
            .groupable(),
        AvailableField::new(src.clone(), "agentId", "Agent", FieldType::Text).groupable(),
        AvailableField::new(src, "recurring", "Recurring", FieldType::Boolean).groupable(),
    ]
}

fn commission_fields() -> Vec<AvailableField> {
    let src = DataSource::Commissions;
    vec![
        AvailableField::new(src.clone(), "id", "Commission ID", FieldType::Text),
        AvailableField::new(src.clone(), "dealId", "Deal", FieldType::Text),
        AvailableField::new(src.clone(), "agentId", "Agent", FieldType::Text).groupable(),
        AvailableField::new(src.clone(), "status", "Status", FieldType::Text).groupable(),
        AvailableField::new(src.clone(), "amount", "Amount", FieldType::Currency).aggregatable(),
        AvailableField::new(src.clone(), "rate", "Rate", FieldType::Percentage).aggregatable(),
        AvailableField::new(src, "paidAt", "Paid", FieldType::Date).groupable(),
    ]
}
