//! Mark command implementation
//!
//! Prints the statements that record scripts as applied. Running them is
//! left to the operator.

use anyhow::Result;
use csd_core::{DiffEngine, Ledger};

use crate::cli::{GlobalArgs, MarkArgs};
use crate::commands::common::{load_scripts_only, ExitCode};
use crate::context::RuntimeContext;

/// Execute the mark command
pub async fn execute(args: &MarkArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let engine = DiffEngine::new(load_scripts_only(&ctx)?, Ledger::new(), ctx.table());

    let unknown: Vec<&str> = args
        .names
        .iter()
        .filter(|name| engine.scripts().get(name).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        for name in &unknown {
            eprintln!("Error: not a script in {}: {name}", ctx.changelog_dir().display());
        }
        return Err(ExitCode(1).into());
    }

    for name in &args.names {
        println!("{}", engine.insert_statement(name));
    }
    Ok(())
}
