//! One-shot geofence containment check.

use std::path::PathBuf;

use clap::Args;

use crate::commands::load_geofence_file;
use crate::error::CliError;

/// Arguments for the `check` subcommand.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to the geofence configuration JSON
    #[arg(long)]
    pub geofences: PathBuf,

    /// Latitude in decimal degrees
    #[arg(long)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long)]
    pub lon: f64,
}

/// Run the `check` subcommand.
pub fn run(args: CheckArgs) -> Result<(), CliError> {
    let zones = load_geofence_file(&args.geofences)?;

    println!("Point: ({}, {})", args.lat, args.lon);
    println!("Zones: {}", zones.len());
    println!();

    let mut inside = 0;
    for zone in &zones {
        let contained = zone.contains(args.lat, args.lon);
        if contained {
            inside += 1;
        }
        println!(
            "  {:7} {} ({})",
            if contained { "inside" } else { "outside" },
            zone.name(),
            zone.id()
        );
    }

    println!();
    println!("Inside {} of {} zone(s)", inside, zones.len());
    Ok(())
}
