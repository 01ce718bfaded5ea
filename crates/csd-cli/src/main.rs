//! changelog-sql-diff CLI - report changelog scripts the database has not seen yet

use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::common::ExitCode;
use commands::{check, ddl, mark, show};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Check(args) => check::execute(args, &cli.global).await,
        cli::Commands::Show(args) => show::execute(args, &cli.global).await,
        cli::Commands::Mark(args) => mark::execute(args, &cli.global).await,
        cli::Commands::Ddl => ddl::execute(&cli.global).await,
    };

    if let Err(err) = result {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays a pasteable report. `RUST_LOG` wins over
/// `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}
