//! relabel CLI - collapse label + detail button list items.
//!
//! Provides commands for:
//! - `apply`: Rewrite a markup file with a rule preset
//! - `rules`: List the passes of a preset

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ApplyArgs, RulesArgs};
use output::Output;

/// relabel - turn label + detail button items into clickable labels.
#[derive(Parser)]
#[command(name = "relabel", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a markup file.
    Apply(ApplyArgs),
    /// List the rewrite passes of a preset.
    Rules(RulesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Apply(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Apply(args) => args.execute(),
        Commands::Rules(args) => {
            args.execute();
            Ok(())
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
