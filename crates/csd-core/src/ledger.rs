//! Snapshot of applied changelog scripts
//!
//! The ledger table lives in the target database and is written by whoever
//! runs the generated INSERT statements. This type holds one read of it.

use serde::Serialize;
use std::collections::BTreeMap;

/// One applied script and when it was last recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Script file name, matching [`crate::ScriptEntry::name`]
    pub name: String,

    /// Unix timestamp of the most recent ledger record
    pub applied_at: i64,
}

/// Applied scripts keyed by name, at most one entry per name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    applied: BTreeMap<String, i64>,
}

impl Ledger {
    /// Create an empty ledger, as on a database that has never been
    /// migrated.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as applied at `applied_at`.
    ///
    /// Rows are fed in query order, so a later row for the same name
    /// replaces the earlier one.
    pub fn insert(&mut self, name: impl Into<String>, applied_at: i64) {
        self.applied.insert(name.into(), applied_at);
    }

    /// When `name` was applied, if ever
    pub fn applied_at(&self, name: &str) -> Option<i64> {
        self.applied.get(name).copied()
    }

    /// Whether `name` has any ledger record
    pub fn contains(&self, name: &str) -> bool {
        self.applied.contains_key(name)
    }

    /// Number of distinct applied scripts
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    /// Whether nothing has been applied
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Entries in ascending name order
    pub fn entries(&self) -> impl Iterator<Item = LedgerEntry> + '_ {
        self.applied.iter().map(|(name, &applied_at)| LedgerEntry {
            name: name.clone(),
            applied_at,
        })
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for Ledger {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut ledger = Ledger::new();
        for (name, applied_at) in iter {
            ledger.insert(name, applied_at);
        }
        ledger
    }
}
