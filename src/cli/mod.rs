//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod locate;
pub mod repair;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Location resolution service for a personal journal
#[derive(Parser)]
#[command(name = "journal-geo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Extract a coordinate pair from text (no network)
    Parse(locate::ParseArgs),

    /// Resolve a free-text location to coordinates and admin code
    Resolve(locate::ResolveArgs),

    /// Build the canonical stored location from text and/or coordinates
    Merge(locate::MergeArgs),

    /// Find and fix rows with swapped latitude/longitude
    Repair(repair::RepairArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Parse(args) => locate::parse(args),
        Commands::Resolve(args) => locate::resolve(args).await,
        Commands::Merge(args) => locate::merge(args).await,
        Commands::Repair(args) => repair::run(args),
        Commands::Config(args) => config::run(args),
    }
}

/// Install the tracing subscriber, honouring `RUST_LOG` over `default_level`
pub(crate) fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
