//! Text report rendering for `csd check`
//!
//! The whole report is valid SQL: everything informational sits inside a
//! `/* ... */` block, and when the pending scripts can be applied as they are
//! the block is closed and their SQL follows. An operator can paste the
//! complete output into a SQL console.

use anyhow::Result;
use csd_core::{DiffEngine, DiffResult, InitScripts};
use std::io::{self, Write};

use crate::context::GitStatus;

/// Width of the `-- === Begin: ... ===` banners
pub(crate) const BANNER_WIDTH: usize = 80;

/// Column the `# by N seconds` note of a changed script starts at
const DRIFT_COLUMN: usize = 50;

/// Report header values
pub(crate) struct Header<'a> {
    pub(crate) database: &'a str,
    pub(crate) table: &'a str,
    pub(crate) changelog_dir: &'a str,
}

/// Open the comment block and describe what is being checked.
pub(crate) fn write_header(w: &mut dyn Write, header: &Header<'_>) -> io::Result<()> {
    writeln!(w, "/*\n\n== Database upgrade check ==\n")?;
    writeln!(w, "  Database:             {}", comment_safe(header.database))?;
    writeln!(w, "  Changelog SQL table:  {}", comment_safe(header.table))?;
    writeln!(
        w,
        "  Changelog directory:  {}",
        comment_safe(header.changelog_dir)
    )?;
    writeln!(w, "\n")
}

/// Report git availability and the application version.
pub(crate) fn write_git_status(w: &mut dyn Write, git: &GitStatus) -> io::Result<()> {
    if git.disabled {
        return writeln!(w, "Checking for git ... disabled.\n");
    }
    match &git.version {
        Some(version) => writeln!(w, "Checking for git ... ok ({})\n", comment_safe(version))?,
        None => writeln!(w, "Checking for git ... not available.\n")?,
    }
    if let Some(app_version) = &git.app_version {
        writeln!(
            w,
            "Current application version: {}\n",
            comment_safe(app_version)
        )?;
    }
    Ok(())
}

/// Show the expected ledger layout after the ledger table turned out to be
/// missing. Stays inside the comment block.
pub(crate) fn write_ledger_hint(w: &mut dyn Write, table: &str, ddl: &str) -> io::Result<()> {
    writeln!(
        w,
        "Here is how table '{}' should look like (also printed by `csd ddl`):\n",
        comment_safe(table)
    )?;
    for line in ddl.lines() {
        writeln!(w, "    {}", comment_safe(line))?;
    }
    writeln!(w)
}

/// List changed and new scripts plus the statements marking them applied.
///
/// `git_checked` is false when script timestamps are unknown, in which case
/// the "updated" section says so instead of claiming nothing changed.
pub(crate) fn write_findings(
    w: &mut dyn Write,
    engine: &DiffEngine,
    result: &DiffResult,
    git_checked: bool,
) -> io::Result<()> {
    write!(
        w,
        "\n\nThese files in changelog have been updated since their execution. Please\n\
         examine changes manually:\n\n"
    )?;
    if !git_checked {
        writeln!(w, "\t(no git, no check)")?;
    } else if result.needs_update.is_empty() {
        writeln!(w, "\t(nothing updated)")?;
    } else {
        for name in &result.needs_update {
            let name_text = comment_safe(name);
            match engine.drift(name) {
                Some(seconds) => writeln!(
                    w,
                    "\t{name_text:<width$} # by {seconds} seconds",
                    width = DRIFT_COLUMN
                )?,
                None => writeln!(w, "\t{name_text}")?,
            }
        }
    }

    write!(w, "\n\nExecute these files in your database:\n\n")?;
    if result.needs_exec.is_empty() {
        writeln!(w, "\t(nothing new)")?;
    } else {
        for name in &result.needs_exec {
            writeln!(w, "\t{}", comment_safe(name))?;
        }
    }

    if result.is_clean() {
        return Ok(());
    }

    write!(
        w,
        "\n\nIf you had problems with files listed above and solved that manually,\n\
         there are SQL queries to mark them as processed (re-run the check before use):\n"
    )?;
    if !result.needs_update.is_empty() {
        write!(w, "\n\t-- Updated:\n")?;
        for name in &result.needs_update {
            writeln!(w, "\t{}", comment_safe(&engine.insert_statement(name)))?;
        }
    }
    if !result.needs_exec.is_empty() {
        write!(w, "\n\t-- New:\n")?;
        for name in &result.needs_exec {
            writeln!(w, "\t{}", comment_safe(&engine.insert_statement(name)))?;
        }
    }
    Ok(())
}

/// Close the comment block, followed by the pending SQL when it can be
/// applied as is.
pub(crate) fn write_payload(
    w: &mut dyn Write,
    engine: &DiffEngine,
    result: &DiffResult,
    init: Option<&InitScripts>,
) -> Result<()> {
    if !result.is_ready_to_apply() {
        write!(w, "\n*/\n\n")?;
        return Ok(());
    }

    write!(
        w,
        "\n\nIf everything looks fine, just copy following SQL code to your database. This text\n\
         and everything above is commented out, so the whole output can be pasted as is.\n*/\n\n"
    )?;

    if let Some(init) = init {
        for name in init.names() {
            write_script(w, "Init Begin", "Init End", name, init.content(name)?)?;
        }
    }
    for name in &result.needs_exec {
        write_script(w, "Begin", "End", name, engine.script_content(name)?)?;
    }
    Ok(())
}

fn write_script(
    w: &mut dyn Write,
    begin: &str,
    end: &str,
    name: &str,
    sql: &str,
) -> io::Result<()> {
    write!(w, "\n{}\n\n", banner(begin, name))?;
    w.write_all(sql.as_bytes())?;
    write!(w, "\n{}\n\n", banner(end, name))
}

/// `-- === {label}: {name} ====...` padded with `=` to [`BANNER_WIDTH`].
pub(crate) fn banner(label: &str, name: &str) -> String {
    let head = format!("-- === {label}: {} ", comment_safe(name));
    let pad = BANNER_WIDTH.saturating_sub(head.chars().count());
    format!("{head}{}", "=".repeat(pad))
}

/// Keep text from terminating the surrounding comment early.
fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /").replace(['\n', '\r'], " ")
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
