//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use csd_core::GitMode;

/// changelog-sql-diff - Report changelog SQL scripts the database has not seen yet
#[derive(Parser, Debug)]
#[command(name = "csd")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path (DuckDB file or :memory:)
    #[arg(short, long, global = true, env = "CSD_DATABASE")]
    pub database: Option<String>,

    /// Override ledger table name
    #[arg(short, long, global = true, env = "CSD_TABLE")]
    pub table: Option<String>,

    /// Override changelog directory
    #[arg(long, global = true)]
    pub changelog_dir: Option<String>,

    /// When to take script timestamps from git history
    #[arg(long, global = true, value_enum)]
    pub git: Option<GitArg>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare the changelog directory with the ledger table
    Check(CheckArgs),

    /// Print the SQL of a changelog script
    Show(ShowArgs),

    /// Print INSERT statements marking scripts as applied
    Mark(MarkArgs),

    /// Print DDL creating the ledger table
    Ddl,
}

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Script file name, including the .sql suffix
    pub name: String,

    /// Look the script up in the init directory instead
    #[arg(long)]
    pub init: bool,
}

/// Arguments for the mark command
#[derive(Args, Debug)]
pub struct MarkArgs {
    /// Script file names, including the .sql suffix
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,
}

/// Report output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Commented text report that can be pasted into a SQL console
    Text,
    /// JSON summary
    Json,
}

/// git timestamp policy on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitArg {
    /// Use git when `git describe` succeeds
    Auto,
    /// Use git whenever it is installed
    Always,
    /// Never use git
    Never,
}

impl From<GitArg> for GitMode {
    fn from(arg: GitArg) -> Self {
        match arg {
            GitArg::Auto => GitMode::Auto,
            GitArg::Always => GitMode::Always,
            GitArg::Never => GitMode::Never,
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
