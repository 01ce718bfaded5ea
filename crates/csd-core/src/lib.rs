//! csd-core - Core library for changelog-sql-diff
//!
//! This crate loads changelog SQL scripts from disk, attaches version-control
//! timestamps to them, and compares them against the ledger of applied
//! scripts. It never talks to a database itself; the ledger snapshot is
//! handed in by the caller.

pub mod config;
pub mod diff;
pub mod error;
pub mod ledger;
pub mod script;
pub mod sql_utils;
pub mod version_probe;

pub use config::{Config, GitMode};
pub use diff::{compare, DiffEngine, DiffResult};
pub use error::{CoreError, CoreResult};
pub use ledger::{Ledger, LedgerEntry};
pub use script::{is_changelog_file_name, InitScripts, ScriptEntry, ScriptSet};
pub use version_probe::{GitProbe, StaticProbe, VersionProbe};
