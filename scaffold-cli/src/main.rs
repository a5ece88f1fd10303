//! Scaffold: safe file generation with diffs and conflict prompts.
//!
//! # Usage
//!
//! ```text
//! scaffold diff <OLD> <NEW> [--context N] [--tab-width N] [--line-numbers] [--width N]
//! scaffold generate <PLAN> [--dry-run] [--force | --skip | --diff]
//! scaffold -v generate <PLAN>      # list validated operations, info logging
//! ```
//!
//! `RUST_LOG` overrides the log level picked by `-v`.

mod commands;
mod prompt;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use commands::{diff::DiffArgs, generate::GenerateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "scaffold",
    version,
    about = "Generate files safely: validate first, show diffs, ask before overwriting",
    long_about = None,
)]
struct Cli {
    /// More output: -v lists validated operations and logs info, -vv logs debug.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a unified diff of two files.
    Diff(DiffArgs),

    /// Write the files described by a YAML generation plan.
    Generate(GenerateArgs),
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!("{cli:?}");
    match cli.command {
        Commands::Diff(args) => args.run(),
        Commands::Generate(args) => args.run(cli.verbose > 0),
    }
}
