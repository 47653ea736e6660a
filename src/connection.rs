//! DuckDB-backed record store.
//!
//! Each built-in data source gets one table holding its records as JSON
//! documents:
//!
//! | column     | type    | meaning                                   |
//! |------------|---------|-------------------------------------------|
//! | `seq`      | BIGINT  | insertion order, used as the fetch order  |
//! | `owner_id` | VARCHAR | the record's owner field, for role scoping|
//! | `body`     | VARCHAR | the record serialized as JSON             |
//!
//! Records are heterogeneous, so the store never imposes a column layout on
//! them; the report engine resolves fields by dotted path after loading.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use duckdb::{params, types::ValueRef, Connection as DuckDbConnection};
use serde_json::Value;

use crate::config::{self, OWNER_FIELD};
use crate::error::{ReportError, Result};
use crate::models::{DataSource, Role, Scope};
use crate::sources::RecordStore;
use crate::sql_builder::SqlBuilder;

/// Wraps a DuckDB connection holding one record table per built-in source.
pub struct Connection {
    conn: DuckDbConnection,
    path: Option<PathBuf>,
}

impl Connection {
    /// Open a store in an in-memory DuckDB database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        let store = Self { conn, path: None };
        store.init_schema()?;
        Ok(store)
    }

    /// Open (or create) a store in a DuckDB database file.
    ///
    /// Creates the parent directory if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = DuckDbConnection::open(&path)?;
        let store = Self {
            conn,
            path: Some(path),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Path of the database file, or `None` when in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn init_schema(&self) -> Result<()> {
        for source in DataSource::BUILT_IN.iter() {
            let table = require_table(source)?;
            self.conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {} (\
                   seq BIGINT NOT NULL, \
                   owner_id VARCHAR, \
                   body VARCHAR NOT NULL\
                 )",
                table
            ))?;
        }
        Ok(())
    }

    /// Append one record to a source's table.
    pub fn insert_record(&self, source: &DataSource, record: &Value) -> Result<()> {
        self.insert_records(source, std::slice::from_ref(record))?;
        Ok(())
    }

    /// Append records to a source's table, preserving their order.
    ///
    /// Returns the number of records written.
    pub fn insert_records(&self, source: &DataSource, records: &[Value]) -> Result<usize> {
        let table = require_table(source)?;
        let mut seq = self.max_seq(table)?;

        let mut appender = self.conn.appender(table)?;
        for record in records {
            seq += 1;
            let owner: Option<String> = record
                .get(OWNER_FIELD)
                .and_then(|v| v.as_str())
                .map(str::to_string);
            let body = serde_json::to_string(record)?;
            appender.append_row(params![seq, owner, body])?;
        }
        appender.flush()?;

        tracing::debug!(source = %source, count = records.len(), "inserted records");
        Ok(records.len())
    }

    /// Load newline-delimited JSON records from a file into a source's table.
    ///
    /// Blank lines are skipped. Returns the number of records imported.
    pub fn import_ndjson<P: AsRef<Path>>(&self, source: &DataSource, path: P) -> Result<usize> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str::<Value>(&line)?);
        }
        let count = self.insert_records(source, &records)?;
        tracing::debug!(
            source = %source,
            count,
            path = %path.as_ref().display(),
            "imported NDJSON records"
        );
        Ok(count)
    }

    /// Number of records stored for a source (all owners).
    pub fn count(&self, source: &DataSource) -> Result<usize> {
        let Some(table) = config::table_name(source) else {
            return Ok(0);
        };
        let value = self.execute_scalar(&format!("SELECT COUNT(*) FROM {}", table), &[])?;
        Ok(value.and_then(|v| v.as_u64()).unwrap_or(0) as usize)
    }

    /// Delete every record stored for a source.
    pub fn clear(&self, source: &DataSource) -> Result<()> {
        let table = require_table(source)?;
        self.conn.execute_batch(&format!("DELETE FROM {}", table))?;
        Ok(())
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s, converting
    /// DuckDB values to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run.
        let column_names: Vec<String> = {
            let stmt = rows.as_ref().ok_or_else(|| {
                ReportError::InvalidArgument("statement was finalized before reading".into())
            })?;
            stmt.column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect()
        };

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, name) in column_names.iter().enumerate() {
                map.insert(name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(&self, sql: &str, params: &[String]) -> Result<Option<Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    fn max_seq(&self, table: &str) -> Result<i64> {
        let seq = self.conn.query_row(
            &format!("SELECT COALESCE(MAX(seq), 0) FROM {}", table),
            [],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(seq)
    }
}

impl RecordStore for Connection {
    fn load(&self, source: &DataSource, scope: &Scope) -> Result<Vec<Value>> {
        let Some(table) = config::table_name(source) else {
            return Ok(Vec::new());
        };

        let mut qb = SqlBuilder::new(table);
        qb.select(&["body"]);
        if scope.role == Role::Agent {
            qb.where_eq("owner_id", &scope.user_id);
        }
        qb.order_by(&["seq ASC"]);
        let (sql, params) = qb.build();

        let rows = self.execute(&sql, &params)?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(Value::String(body)) = row.get("body") else {
                continue;
            };
            match serde_json::from_str::<Value>(body) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "skipping unreadable record");
                }
            }
        }
        Ok(records)
    }
}

fn require_table(source: &DataSource) -> Result<&'static str> {
    config::table_name(source).ok_or_else(|| {
        ReportError::InvalidArgument(format!("no record table for source '{}'", source))
    })
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> Value {
    match val {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => Value::Number(n.into()),
        ValueRef::SmallInt(n) => Value::Number(n.into()),
        ValueRef::Int(n) => Value::Number(n.into()),
        ValueRef::BigInt(n) => Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => Value::Number(i.into()),
            Err(_) => Value::String(n.to_string()),
        },
        ValueRef::UBigInt(n) => Value::Number(n.into()),
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).to_string()),
        _ => Value::Null,
    }
}
