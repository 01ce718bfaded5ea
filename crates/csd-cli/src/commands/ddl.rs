//! DDL command implementation

use anyhow::{Context, Result};
use csd_db::ledger_table_ddl;

use crate::cli::GlobalArgs;
use crate::context::RuntimeContext;

/// Execute the ddl command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let ddl = ledger_table_ddl(ctx.table()).context("Failed to build ledger table DDL")?;
    print!("{ddl}");
    Ok(())
}
