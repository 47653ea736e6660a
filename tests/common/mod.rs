//! Shared test fixtures for the report engine integration tests.
//!
//! Provides a small agency dataset (deals, properties, expenses,
//! commissions) owned by two agents, loadable into a `MemoryStore` or a
//! file-backed DuckDB `Connection`.

#![allow(dead_code)]

use agency_reports::{Connection, DataSource, FieldType, MemoryStore, SelectedField};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

pub fn deals() -> Vec<Value> {
    vec![
        json!({
            "id": "deal-001",
            "title": "Marina Apartment Sale",
            "status": "active",
            "stage": "negotiation",
            "agentId": "agent-1",
            "clientName": "Layla Haddad",
            "propertyId": "prop-001",
            "financial": {"agreedPrice": 250000, "commissionRate": 2.5, "depositPaid": true},
            "createdAt": "2024-01-15"
        }),
        json!({
            "id": "deal-002",
            "title": "Palm Villa Sale",
            "status": "closed",
            "stage": "completed",
            "agentId": "agent-2",
            "clientName": "Omar Farouk",
            "propertyId": "prop-002",
            "financial": {"agreedPrice": 480000, "commissionRate": 3, "depositPaid": true},
            "createdAt": "2024-02-20"
        }),
        json!({
            "id": "deal-003",
            "title": "Corniche Lease",
            "status": "active",
            "stage": "viewing",
            "agentId": "agent-1",
            "clientName": "Sara Nasser",
            "propertyId": "prop-003",
            "financial": {"agreedPrice": 120000, "depositPaid": false},
            "createdAt": "2024-03-05T10:30:00Z"
        }),
        json!({
            "id": "deal-004",
            "title": "Downtown Office",
            "status": "pending",
            "stage": "lead",
            "agentId": "agent-2",
            "clientName": null,
            "createdAt": "2024-03-28"
        }),
    ]
}

pub fn properties() -> Vec<Value> {
    vec![
        json!({
            "id": "prop-001",
            "title": "Marina Heights 1204",
            "type": "apartment",
            "status": "sold",
            "agentId": "agent-1",
            "location": {"city": "Dubai", "district": "Marina"},
            "price": 1200000,
            "bedrooms": 2,
            "area": 110.5,
            "furnished": true,
            "listedAt": "2023-11-02"
        }),
        json!({
            "id": "prop-002",
            "title": "Frond G Villa",
            "type": "villa",
            "status": "sold",
            "agentId": "agent-2",
            "location": {"city": "Dubai", "district": "Palm"},
            "price": 5400000,
            "bedrooms": 5,
            "area": 420,
            "furnished": false,
            "listedAt": "2023-12-14"
        }),
        json!({
            "id": "prop-003",
            "title": "Corniche Tower 802",
            "type": "apartment",
            "status": "available",
            "agentId": "agent-1",
            "location": {"city": "Abu Dhabi", "district": "Corniche"},
            "price": 900000,
            "bedrooms": 1,
            "area": 78,
            "furnished": false,
            "listedAt": "2024-01-09"
        }),
    ]
}

pub fn expenses() -> Vec<Value> {
    vec![
        json!({
            "id": "exp-001",
            "description": "Contract review",
            "category": "legal",
            "amount": 500,
            "date": "2024-01-10",
            "paymentMethod": "card",
            "agentId": "agent-1",
            "recurring": false
        }),
        json!({
            "id": "exp-002",
            "description": "Office AC repair",
            "category": "maintenance",
            "amount": 1200,
            "date": "2024-01-18",
            "paymentMethod": "transfer",
            "agentId": "agent-2",
            "recurring": false
        }),
        json!({
            "id": "exp-003",
            "description": "Electricity",
            "category": "utility",
            "amount": 300,
            "date": "2024-02-01",
            "paymentMethod": "transfer",
            "agentId": "agent-1",
            "recurring": true
        }),
    ]
}

pub fn commissions() -> Vec<Value> {
    vec![
        json!({
            "id": "com-001",
            "dealId": "deal-001",
            "agentId": "agent-1",
            "status": "paid",
            "amount": 6250,
            "rate": 2.5,
            "paidAt": "2024-02-01"
        }),
        json!({
            "id": "com-002",
            "dealId": "deal-002",
            "agentId": "agent-2",
            "status": "pending",
            "amount": 14400,
            "rate": 3,
            "paidAt": null
        }),
    ]
}

/// A `MemoryStore` holding every sample record.
pub fn sample_store() -> MemoryStore {
    MemoryStore::new()
        .with_records(DataSource::Deals, deals())
        .with_records(DataSource::Properties, properties())
        .with_records(DataSource::Expenses, expenses())
        .with_records(DataSource::Commissions, commissions())
}

/// A file-backed DuckDB `Connection` in a temporary directory, holding every
/// sample record.
///
/// Returns `(Connection, tempfile::TempDir)`. The caller must keep the
/// `TempDir` alive for the duration of the test.
pub fn setup_sample_db() -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let conn = Connection::open(tmp_dir.path().join("records.duckdb")).unwrap();

    conn.insert_records(&DataSource::Deals, &deals()).unwrap();
    conn.insert_records(&DataSource::Properties, &properties()).unwrap();
    conn.insert_records(&DataSource::Commissions, &commissions()).unwrap();
    // Expenses go through the NDJSON import path.
    import_via_ndjson(&conn, DataSource::Expenses, &expenses());

    (conn, tmp_dir)
}

/// Write records as NDJSON to a temp file and import them.
pub fn import_via_ndjson(conn: &Connection, source: DataSource, rows: &[Value]) -> usize {
    let mut file = NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(file, "{}", serde_json::to_string(row).unwrap()).unwrap();
    }
    file.flush().unwrap();
    conn.import_ndjson(&source, file.path()).unwrap()
}

/// A selected field whose id is its path.
pub fn field(source: DataSource, path: &str, field_type: FieldType) -> SelectedField {
    SelectedField::new(path, source, path, path, field_type)
}
