//! themelab CLI - themed project scaffolding.
//!
//! Provides commands for:
//! - `new`: Scaffold a themed project via the external app generator
//! - `watch`: Follow the dev server's build status with live reload

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{NewArgs, WatchArgs};
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// themelab - themed project scaffolding.
#[derive(Parser)]
#[command(name = "themelab", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new themed project.
    New(NewArgs),
    /// Connect to the dev server and follow build status.
    Watch(WatchArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::New(args) => args.verbose,
        Commands::Watch(args) => args.verbose,
    };

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = match cli.command {
        Commands::New(args) => rt.block_on(args.execute(VERSION)),
        Commands::Watch(args) => rt.block_on(args.execute()),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
