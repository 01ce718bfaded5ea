//! Error types for csd-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Identifier cannot be quoted safely (D004)
    #[error("[D004] Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Whether this error means the queried table does not exist
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, DbError::TableNotFound(_))
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error carries no structured catalog error kind, so the
        // message is the only signal. Patterns stay narrow so that missing
        // columns or functions are not mistaken for a missing table.
        let msg = err.to_string();
        if is_missing_table_message(&msg) {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}

fn is_missing_table_message(msg: &str) -> bool {
    msg.contains("Table with name")
        || msg.contains("Table or view with name")
        || msg.contains("Schema with name")
        || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("does not exist"))
}
