//! Show command implementation

use anyhow::Result;
use csd_core::{DiffEngine, InitScripts, Ledger};
use std::io::{self, Write};

use crate::cli::{GlobalArgs, ShowArgs};
use crate::commands::common::{load_scripts_only, ExitCode, EXIT_DIRECTORY_FAILED};
use crate::context::RuntimeContext;

/// Execute the show command
pub async fn execute(args: &ShowArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;

    let sql = if args.init {
        let init = match InitScripts::load(&ctx.init_dir()) {
            Ok(init) => init,
            Err(e) => {
                eprintln!("Error: {e}");
                return Err(ExitCode(EXIT_DIRECTORY_FAILED).into());
            }
        };
        init.content(&args.name).map(str::to_string)
    } else {
        let engine = DiffEngine::new(load_scripts_only(&ctx)?, Ledger::new(), ctx.table());
        engine.script_content(&args.name).map(str::to_string)
    };

    match sql {
        Ok(sql) => {
            let mut out = io::stdout().lock();
            out.write_all(sql.as_bytes())?;
            if !sql.ends_with('\n') {
                writeln!(out)?;
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Err(ExitCode(1).into())
        }
    }
}
