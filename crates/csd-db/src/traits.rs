//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// A single column value from a query result
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// Any other type, rendered for display
    Other(String),
}

impl DbValue {
    /// The value as text, if it is text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DbValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer; reals are truncated
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DbValue::Integer(i) => Some(*i),
            DbValue::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Whether the value is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, DbValue::Null)
    }
}

/// Database abstraction trait for changelog-sql-diff
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute multiple SQL statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a read query with positional text parameters and collect every
    /// row
    async fn query_rows(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Vec<DbValue>>>;

    /// Name of the database the connection points at, for report headers
    async fn database_name(&self) -> DbResult<String>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
