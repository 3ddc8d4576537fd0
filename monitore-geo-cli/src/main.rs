//! Monitore Geo CLI - command-line harness for the spatial-awareness core.
//!
//! Provides one-shot geofence checks and simulated location-feed replay
//! against the `monitore-geo` library.

mod commands;
mod error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::check::CheckArgs;
use commands::simulate::SimulateArgs;

#[derive(Parser)]
#[command(name = "monitore-geo")]
#[command(about = "Geofencing and tile-cache harness for the Monitore map core", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which geofences contain a point
    Check(CheckArgs),
    /// Replay a location track through the spatial core
    Simulate(SimulateArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check(args) => commands::check::run(args),
        Commands::Simulate(args) => commands::simulate::run(args).await,
    };

    if let Err(e) = result {
        e.exit();
    }
}
