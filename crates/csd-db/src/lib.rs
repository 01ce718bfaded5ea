//! csd-db - Database layer for changelog-sql-diff
//!
//! This crate provides the `Database` trait, its DuckDB implementation, and
//! the loader that turns the ledger table into a [`csd_core::Ledger`].

pub mod duckdb;
pub mod error;
pub mod ledger;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use ledger::{ledger_query, ledger_table_ddl, load_ledger};
pub use traits::{Database, DbValue};
