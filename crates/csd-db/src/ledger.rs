//! Ledger table reader
//!
//! The ledger table may hold several rows per script (one per time it was
//! marked as applied). Only the newest row per script matters.

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use csd_core::sql_utils::{
    is_valid_qualified_name, quote_ident, quote_literal, quote_qualified, split_qualified_name,
};
use csd_core::Ledger;

/// Build the ledger query for `table`.
///
/// `ORDER BY filename, MAX(id)` keeps row order deterministic; with one
/// group per file name, the later row for a name would win on a tie.
pub fn ledger_query(table: &str) -> DbResult<String> {
    let table = checked_table(table)?;
    Ok(format!(
        "SELECT filename, CAST(floor(epoch(MAX(update_time))) AS BIGINT) AS update_time
         FROM {table}
         GROUP BY filename
         ORDER BY filename, MAX(id)"
    ))
}

/// Load the newest applied timestamp of every script in `table`.
///
/// A missing table comes back as [`DbError::TableNotFound`] so the caller
/// can treat a never-migrated database as an empty ledger.
pub async fn load_ledger(db: &dyn Database, table: &str) -> DbResult<Ledger> {
    let sql = ledger_query(table)?;
    let rows = db.query_rows(&sql, &[]).await?;

    let mut ledger = Ledger::new();
    for row in rows {
        let Some(name) = row.first().and_then(|v| v.as_str()) else {
            log::warn!("Skipping ledger row without a file name in {table}");
            continue;
        };
        let applied_at = row.get(1).and_then(|v| v.as_i64()).unwrap_or(0);
        ledger.insert(name, applied_at);
    }

    log::info!(
        "Loaded {} ledger records from {} ({})",
        ledger.len(),
        table,
        db.db_type()
    );
    Ok(ledger)
}

/// DDL for a ledger table compatible with [`load_ledger`].
///
/// Printed for the operator; never executed by this crate's callers.
pub fn ledger_table_ddl(table: &str) -> DbResult<String> {
    let quoted = checked_table(table)?;
    let sequence = quote_qualified(&format!("{table}_id_seq"));

    let mut ddl = String::new();
    if table.contains('.') {
        let (schema, _) = split_qualified_name(table);
        ddl.push_str(&format!(
            "CREATE SCHEMA IF NOT EXISTS {};\n",
            quote_qualified(schema)
        ));
    }
    ddl.push_str(&format!("CREATE SEQUENCE IF NOT EXISTS {sequence};\n"));
    ddl.push_str(&format!(
        "CREATE TABLE IF NOT EXISTS {quoted} (\n    {} BIGINT PRIMARY KEY DEFAULT nextval({}),\n    {} VARCHAR NOT NULL,\n    {} TIMESTAMPTZ NOT NULL DEFAULT current_timestamp\n);\n",
        quote_ident("id"),
        quote_literal(&sequence),
        quote_ident("filename"),
        quote_ident("update_time"),
    ));
    Ok(ddl)
}

fn checked_table(table: &str) -> DbResult<String> {
    if !is_valid_qualified_name(table) {
        return Err(DbError::InvalidIdentifier(format!("{table:?}")));
    }
    Ok(quote_qualified(table))
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
