//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, DbValue};
use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{AccessMode, Config, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open or create a DuckDB file for reading and writing
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an existing database without write access.
    ///
    /// A missing file is a [`DbError::ConnectionError`]; nothing is created.
    /// `:memory:` opens an empty in-memory database.
    pub fn open_read_only(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            return Self::in_memory();
        }
        let path = Path::new(path);
        if !path.is_file() {
            return Err(DbError::ConnectionError(format!(
                "database file not found: {}",
                path.display()
            )));
        }

        let config = Config::default()
            .access_mode(AccessMode::ReadOnly)
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
        let conn = Connection::open_with_flags(path, config)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    /// Query rows synchronously
    fn query_rows_sync(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Vec<DbValue>>> {
        log::debug!("duckdb query: {}", sql.trim());
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(duckdb::params_from_iter(params.iter()))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let column_count = row.as_ref().column_count();
            let mut values = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                values.push(to_db_value(row.get::<_, Value>(idx)?));
            }
            out.push(values);
        }
        Ok(out)
    }

    fn database_name_sync(&self) -> DbResult<String> {
        let rows = self.query_rows_sync("SELECT current_database()", &[])?;
        rows.into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .and_then(|value| match value {
                DbValue::Text(name) => Some(name),
                _ => None,
            })
            .ok_or_else(|| DbError::ExecutionError("current_database() returned no name".into()))
    }
}

fn to_db_value(value: Value) -> DbValue {
    match value {
        Value::Null => DbValue::Null,
        Value::Boolean(b) => DbValue::Integer(i64::from(b)),
        Value::TinyInt(i) => DbValue::Integer(i64::from(i)),
        Value::SmallInt(i) => DbValue::Integer(i64::from(i)),
        Value::Int(i) => DbValue::Integer(i64::from(i)),
        Value::BigInt(i) => DbValue::Integer(i),
        Value::UTinyInt(i) => DbValue::Integer(i64::from(i)),
        Value::USmallInt(i) => DbValue::Integer(i64::from(i)),
        Value::UInt(i) => DbValue::Integer(i64::from(i)),
        Value::UBigInt(i) => match i64::try_from(i) {
            Ok(i) => DbValue::Integer(i),
            Err(_) => DbValue::Other(i.to_string()),
        },
        Value::HugeInt(i) => match i64::try_from(i) {
            Ok(i) => DbValue::Integer(i),
            Err(_) => DbValue::Other(i.to_string()),
        },
        Value::Float(f) => DbValue::Real(f64::from(f)),
        Value::Double(f) => DbValue::Real(f),
        Value::Text(s) => DbValue::Text(s),
        other => DbValue::Other(format!("{other:?}")),
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query_rows(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Vec<DbValue>>> {
        self.query_rows_sync(sql, params)
    }

    async fn database_name(&self) -> DbResult<String> {
        self.database_name_sync()
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
