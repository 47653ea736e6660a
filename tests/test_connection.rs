//! DuckDB record store tests.

mod common;

use agency_reports::{Connection, DataSource, RecordStore, Scope};
use serde_json::json;

// ---------------------------------------------------------------------------
// Loading and scoping
// ---------------------------------------------------------------------------

#[test]
fn loads_records_in_insertion_order() {
    let (conn, _tmp) = common::setup_sample_db();
    let deals = conn.load(&DataSource::Deals, &Scope::admin("admin-1")).unwrap();
    let ids: Vec<&str> = deals.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["deal-001", "deal-002", "deal-003", "deal-004"]);
    assert_eq!(deals, common::deals());
}

#[test]
fn nested_documents_survive_storage() {
    let (conn, _tmp) = common::setup_sample_db();
    let properties = conn.load(&DataSource::Properties, &Scope::admin("admin-1")).unwrap();
    assert_eq!(properties[0]["location"]["district"], "Marina");
    assert_eq!(properties[0]["area"], json!(110.5));
}

#[test]
fn agent_scope_filters_by_owner() {
    let (conn, _tmp) = common::setup_sample_db();
    let mine = conn.load(&DataSource::Expenses, &Scope::agent("agent-1")).unwrap();
    let ids: Vec<&str> = mine.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["exp-001", "exp-003"]);

    let none = conn.load(&DataSource::Expenses, &Scope::agent("agent-7")).unwrap();
    assert!(none.is_empty());
}

// ---------------------------------------------------------------------------
// Writing and importing
// ---------------------------------------------------------------------------

#[test]
fn ndjson_import_counts_records() {
    let conn = Connection::open_in_memory().unwrap();
    let imported = common::import_via_ndjson(&conn, DataSource::Expenses, &common::expenses());
    assert_eq!(imported, 3);
    assert_eq!(conn.count(&DataSource::Expenses).unwrap(), 3);
}

#[test]
fn ndjson_import_skips_blank_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("commissions.ndjson");
    std::fs::write(&path, "{\"id\": \"c1\"}\n\n   \n{\"id\": \"c2\"}\n").unwrap();

    let conn = Connection::open_in_memory().unwrap();
    assert_eq!(conn.import_ndjson(&DataSource::Commissions, &path).unwrap(), 2);
}

#[test]
fn ndjson_import_rejects_bad_json() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("broken.ndjson");
    std::fs::write(&path, "{\"id\": \"c1\"}\nnot json\n").unwrap();

    let conn = Connection::open_in_memory().unwrap();
    assert!(conn.import_ndjson(&DataSource::Commissions, &path).is_err());
}

#[test]
fn appends_continue_the_sequence() {
    let conn = Connection::open_in_memory().unwrap();
    conn.insert_record(&DataSource::Expenses, &json!({"id": "a"})).unwrap();
    conn.insert_records(&DataSource::Expenses, &[json!({"id": "b"}), json!({"id": "c"})])
        .unwrap();
    conn.insert_record(&DataSource::Expenses, &json!({"id": "d"})).unwrap();

    let records = conn.load(&DataSource::Expenses, &Scope::admin("admin-1")).unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
}

#[test]
fn count_and_clear() {
    let (conn, _tmp) = common::setup_sample_db();
    assert_eq!(conn.count(&DataSource::Deals).unwrap(), 4);
    assert_eq!(conn.count(&DataSource::Properties).unwrap(), 3);
    assert_eq!(conn.count(&DataSource::Commissions).unwrap(), 2);
    assert_eq!(conn.count(&DataSource::from("listings")).unwrap(), 0);

    conn.clear(&DataSource::Deals).unwrap();
    assert_eq!(conn.count(&DataSource::Deals).unwrap(), 0);
    assert_eq!(conn.count(&DataSource::Properties).unwrap(), 3);
}

#[test]
fn unknown_sources_cannot_be_written() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(conn.insert_record(&DataSource::from("listings"), &json!({})).is_err());
    assert!(conn.clear(&DataSource::from("listings")).is_err());
    let loaded = conn
        .load(&DataSource::from("listings"), &Scope::admin("admin-1"))
        .unwrap();
    assert!(loaded.is_empty());
}

// ---------------------------------------------------------------------------
// Raw SQL
// ---------------------------------------------------------------------------

#[test]
fn execute_returns_named_columns() {
    let (conn, _tmp) = common::setup_sample_db();
    let rows = conn
        .execute(
            "SELECT owner_id, COUNT(*) AS n FROM expense_records GROUP BY owner_id ORDER BY owner_id",
            &[],
        )
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["owner_id"], "agent-1");
    assert_eq!(rows[0]["n"], json!(2));
    assert_eq!(rows[1]["owner_id"], "agent-2");
}

#[test]
fn execute_binds_parameters() {
    let (conn, _tmp) = common::setup_sample_db();
    let value = conn
        .execute_scalar(
            "SELECT COUNT(*) FROM deal_records WHERE owner_id = ?",
            &["agent-2".to_string()],
        )
        .unwrap();
    assert_eq!(value, Some(json!(2)));

    let empty = conn
        .execute_scalar("SELECT body FROM deal_records WHERE owner_id = ?", &["x".to_string()])
        .unwrap();
    assert_eq!(empty, None);
}

// ---------------------------------------------------------------------------
// Storage location
// ---------------------------------------------------------------------------

#[test]
fn file_store_persists_across_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("records.duckdb");
    {
        let conn = Connection::open(&path).unwrap();
        conn.insert_records(&DataSource::Commissions, &common::commissions())
            .unwrap();
        assert_eq!(conn.path(), Some(path.as_path()));
    }
    let conn = Connection::open(&path).unwrap();
    assert_eq!(conn.count(&DataSource::Commissions).unwrap(), 2);
    let records = conn.load(&DataSource::Commissions, &Scope::agent("agent-2")).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], "com-002");
}

#[test]
fn in_memory_store_has_no_path() {
    let conn = Connection::open_in_memory().unwrap();
    assert!(conn.path().is_none());
    assert_eq!(conn.count(&DataSource::Deals).unwrap(), 0);
}

#[test]
fn raw_connection_shares_tables() {
    let (conn, _tmp) = common::setup_sample_db();
    conn.raw()
        .execute_batch("DELETE FROM deal_records WHERE owner_id = 'agent-2'")
        .unwrap();
    assert_eq!(conn.count(&DataSource::Deals).unwrap(), 2);
}
