//! Check command implementation
//!
//! Compare the changelog directory with the ledger table and print what is
//! left to do.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csd_core::{DiffEngine, DiffResult, InitScripts, Ledger};
use csd_db::{ledger_table_ddl, load_ledger, DbError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::cli::{CheckArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{ExitCode, EXIT_DIRECTORY_FAILED, EXIT_LEDGER_FAILED};
use crate::commands::report::{self, Header};
use crate::context::RuntimeContext;

/// Check summary for JSON output
#[derive(Debug, Serialize)]
struct CheckSummary {
    timestamp: DateTime<Utc>,
    database: String,
    table: String,
    changelog_dir: String,
    scripts_loaded: usize,
    ledger_records: usize,
    ledger_table_missing: bool,
    git_timestamps: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_version: Option<String>,
    #[serde(flatten)]
    result: DiffResult,
    /// Seconds each changed script was committed after its ledger record
    drift_seconds: BTreeMap<String, i64>,
    insert_statements: Vec<String>,
}

/// Execute the check command
pub async fn execute(args: &CheckArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let db = match ctx.connect() {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Err(ExitCode(EXIT_LEDGER_FAILED).into());
        }
    };
    let text_mode = args.output == OutputFormat::Text;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let database = db
        .database_name()
        .await
        .unwrap_or_else(|_| db.db_type().to_string());
    let changelog_dir = ctx.changelog_dir();
    let changelog_dir_display = changelog_dir.display().to_string();

    if text_mode {
        report::write_header(
            &mut out,
            &Header {
                database: &database,
                table: ctx.table(),
                changelog_dir: &changelog_dir_display,
            },
        )?;
    }

    let git = ctx.git();
    if text_mode {
        report::write_git_status(&mut out, &git)?;
        write!(out, "Loading changelog directory ... ")?;
        out.flush()?;
    }

    // Load files
    let scripts = match ctx.load_scripts(&git) {
        Ok(scripts) => scripts,
        Err(e) => {
            if text_mode {
                write!(out, "Failed: {e}\n\n")?;
            }
            log::error!("{e}");
            return Err(ExitCode(EXIT_DIRECTORY_FAILED).into());
        }
    };
    if text_mode {
        writeln!(out, "{:4} files loaded.", scripts.len())?;
        write!(out, "Loading {} table ... ", ctx.table())?;
        out.flush()?;
    }

    // Load database
    let (ledger, table_missing) = match load_ledger(db.as_ref(), ctx.table()).await {
        Ok(ledger) => {
            if text_mode {
                writeln!(out, "{:6} records loaded.", ledger.len())?;
            }
            (ledger, false)
        }
        Err(DbError::TableNotFound(msg)) => {
            // A database that was never migrated has no ledger yet
            log::warn!(
                "Ledger table {} does not exist, treating every script as new",
                ctx.table()
            );
            if text_mode {
                write!(out, "Failed: {msg}\n\n")?;
                if let Ok(ddl) = ledger_table_ddl(ctx.table()) {
                    report::write_ledger_hint(&mut out, ctx.table(), &ddl)?;
                }
            }
            (Ledger::new(), true)
        }
        Err(e) => {
            if text_mode {
                write!(out, "Failed: {e}\n\n")?;
            }
            log::error!("{e}");
            return Err(ExitCode(EXIT_LEDGER_FAILED).into());
        }
    };

    // Find changes
    let ledger_records = ledger.len();
    let engine = DiffEngine::new(scripts, ledger, ctx.table());
    let result = engine.compare();

    if !text_mode {
        let summary = CheckSummary {
            timestamp: Utc::now(),
            database,
            table: ctx.table().to_string(),
            changelog_dir: changelog_dir_display,
            scripts_loaded: engine.scripts().len(),
            ledger_records,
            ledger_table_missing: table_missing,
            git_timestamps: git.timestamps_enabled(),
            app_version: git.app_version.clone(),
            drift_seconds: drift_seconds(&engine, &result),
            insert_statements: insert_statements(&engine, &result),
            result,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }

    report::write_findings(&mut out, &engine, &result, git.timestamps_enabled())?;

    let init = if result.is_ready_to_apply() {
        load_init_scripts(&ctx)?
    } else {
        None
    };
    report::write_payload(&mut out, &engine, &result, init.as_ref())?;
    out.flush()?;

    Ok(())
}

/// Statements marking every finding as applied, changed scripts first
fn insert_statements(engine: &DiffEngine, result: &DiffResult) -> Vec<String> {
    result
        .needs_update
        .iter()
        .chain(&result.needs_exec)
        .map(|name| engine.insert_statement(name))
        .collect()
}

/// Drift of every script that needs an update
fn drift_seconds(engine: &DiffEngine, result: &DiffResult) -> BTreeMap<String, i64> {
    result
        .needs_update
        .iter()
        .filter_map(|name| Some((name.clone(), engine.drift(name)?)))
        .collect()
}

/// Init scripts for a fresh install, if the project has an init directory
fn load_init_scripts(ctx: &RuntimeContext) -> Result<Option<InitScripts>> {
    let dir = ctx.init_dir();
    if !dir.is_dir() {
        return Ok(None);
    }
    let init = InitScripts::load(&dir)
        .with_context(|| format!("Failed to load init scripts from {}", dir.display()))?;
    Ok(Some(init))
}
