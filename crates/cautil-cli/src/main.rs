//! ca-util binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cautil_cli::cli::{Cli, Commands};
use cautil_cli::commands::{CreateCommand, SecretCommand};
use cautil_cli::output::OutputFormat;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), cautil_cli::CliError> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Create(args) => {
            let cmd = CreateCommand::new(&cli.store_dir);
            cmd.execute(&mut stdout, &format, args)?;
        }
        Commands::Secret(args) => {
            let cmd = SecretCommand::new(&cli.store_dir);
            cmd.execute(&mut stdout, &format, args)?;
        }
    }

    Ok(())
}
