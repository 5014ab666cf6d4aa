//! # checkworld CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use checkworld_cli::validate::{run_validate, ValidateArgs};

/// Deep strict validation of Minecraft Alpha/Beta world chunk files.
///
/// Intended for worlds without modded entity types. Entities are only
/// checked for an accepted type; everything else is checked down to
/// block and item ids.
#[derive(Parser, Debug)]
#[command(name = "checkworld", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check every chunk file in a world directory.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("checkworld starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
    };

    ExitCode::from(exit_status(result))
}

/// Setup failures are reported once, through the log, and exit with 1.
fn exit_status(result: anyhow::Result<u8>) -> u8 {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            1
        }
    }
}
