//! Shared utilities for CLI commands

use anyhow::Result;
use csd_core::ScriptSet;
use std::fmt;

use crate::context::RuntimeContext;

/// Exit code when the changelog directory cannot be loaded
pub(crate) const EXIT_DIRECTORY_FAILED: i32 = 1;

/// Exit code when the ledger database cannot be opened, or the ledger cannot
/// be loaded for a reason other than a missing table
pub(crate) const EXIT_LEDGER_FAILED: i32 = 2;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Empty: the command already reported the failure.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load changelog scripts without git timestamps, for commands that only
/// need names and content.
pub(crate) fn load_scripts_only(ctx: &RuntimeContext) -> Result<ScriptSet> {
    match ScriptSet::load(&ctx.changelog_dir(), None) {
        Ok(scripts) => Ok(scripts),
        Err(e) => {
            eprintln!("Error: {e}");
            Err(ExitCode(EXIT_DIRECTORY_FAILED).into())
        }
    }
}
