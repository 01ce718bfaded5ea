//! Comparison of changelog scripts against the ledger
//!
//! Two findings come out of a comparison:
//!
//! - **needs update**: scripts committed after their last ledger record,
//!   which an operator has to review by hand;
//! - **needs exec**: scripts with no ledger record at all.
//!
//! Both lists follow the script set's ascending name order.

use crate::error::CoreResult;
use crate::ledger::Ledger;
use crate::script::ScriptSet;
use crate::sql_utils::{quote_literal, quote_qualified};
use serde::Serialize;

/// Outcome of comparing a script set with a ledger snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// Scripts changed since they were recorded as applied
    pub needs_update: Vec<String>,

    /// Scripts never recorded as applied
    pub needs_exec: Vec<String>,
}

impl DiffResult {
    /// Whether the database is up to date with the changelog
    pub fn is_clean(&self) -> bool {
        self.needs_update.is_empty() && self.needs_exec.is_empty()
    }

    /// New scripts are pending and nothing needs manual review, so the
    /// pending scripts can be pasted as a whole.
    pub fn is_ready_to_apply(&self) -> bool {
        self.needs_update.is_empty() && !self.needs_exec.is_empty()
    }
}

/// Compare `scripts` with `ledger`.
///
/// A script needs an update when the ledger knows it and its timestamp is
/// strictly older than the script's. An unknown script timestamp (0) never
/// counts, so missing version history cannot produce a false "changed"
/// finding.
pub fn compare(scripts: &ScriptSet, ledger: &Ledger) -> DiffResult {
    let mut result = DiffResult::default();

    for script in scripts.iter() {
        match ledger.applied_at(&script.name) {
            Some(applied_at) if script.modified_at != 0 && applied_at < script.modified_at => {
                result.needs_update.push(script.name.clone());
            }
            Some(_) => {}
            None => result.needs_exec.push(script.name.clone()),
        }
    }

    log::debug!(
        "Compared {} scripts with {} ledger records: {} updated, {} new",
        scripts.len(),
        ledger.len(),
        result.needs_update.len(),
        result.needs_exec.len()
    );
    result
}

/// Loaded scripts and ledger snapshot, plus the statement text an operator
/// needs to act on a comparison.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    scripts: ScriptSet,
    ledger: Ledger,
    ledger_table: String,
}

impl DiffEngine {
    /// Create an engine over already-loaded data.
    ///
    /// `ledger_table` names the table generated INSERT statements target.
    pub fn new(scripts: ScriptSet, ledger: Ledger, ledger_table: impl Into<String>) -> Self {
        Self {
            scripts,
            ledger,
            ledger_table: ledger_table.into(),
        }
    }

    /// Run the comparison. Calling it repeatedly yields identical results.
    pub fn compare(&self) -> DiffResult {
        compare(&self.scripts, &self.ledger)
    }

    /// INSERT statement marking `name` as applied now.
    ///
    /// The ledger table fills `id` and `update_time` itself. The statement
    /// is only ever printed.
    pub fn insert_statement(&self, name: &str) -> String {
        format!(
            "INSERT INTO {} (filename) VALUES ({});",
            quote_qualified(&self.ledger_table),
            quote_literal(name)
        )
    }

    /// Seconds between the newest ledger record of `name` and the script's
    /// last change. `None` unless the script is both loaded and recorded.
    pub fn drift(&self, name: &str) -> Option<i64> {
        let script = self.scripts.get(name)?;
        let applied_at = self.ledger.applied_at(name)?;
        Some(script.modified_at - applied_at)
    }

    /// Raw SQL text of a loaded script.
    pub fn script_content(&self, name: &str) -> CoreResult<&str> {
        self.scripts.content(name)
    }

    /// The loaded scripts
    pub fn scripts(&self) -> &ScriptSet {
        &self.scripts
    }

    /// The ledger snapshot
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Table the generated statements write to
    pub fn ledger_table(&self) -> &str {
        &self.ledger_table
    }
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod tests;
