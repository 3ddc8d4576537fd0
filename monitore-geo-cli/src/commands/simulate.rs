//! Simulated location-feed replay.
//!
//! Drives the full map-view flow without a device: each track point is
//! pushed through the geofence manager (printing enter/exit events as they
//! fire) and its viewport tile through the tile cache (reporting fetch vs.
//! reuse), with teardown routed through a resource manager exactly as the
//! map view does it.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use serde::Deserialize;
use tracing::{debug, info, warn};

use monitore_geo::coord::tile_at;
use monitore_geo::geofence::{EventKind, GeofenceManager};
use monitore_geo::resource::MapResourceManager;
use monitore_geo::tile_cache::TileCache;

use crate::commands::load_geofence_file;
use crate::error::CliError;

/// Arguments for the `simulate` subcommand.
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Path to the geofence configuration JSON
    #[arg(long)]
    pub geofences: PathBuf,

    /// Path to the track JSON (array of {latitude, longitude} points)
    #[arg(long)]
    pub track: PathBuf,

    /// Delay between track points in milliseconds
    #[arg(long, default_value = "250")]
    pub interval_ms: u64,

    /// Tile zoom level for viewport bookkeeping
    #[arg(long, default_value = "15")]
    pub zoom: u8,

    /// Tile cache capacity
    #[arg(long, default_value = "200")]
    pub max_tiles: usize,
}

/// One point of a simulated track.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Parse a JSON array of track points.
pub fn parse_track(json: &str) -> Result<Vec<TrackPoint>, CliError> {
    serde_json::from_str(json).map_err(|e| CliError::Track(e.to_string()))
}

/// Run the `simulate` subcommand.
pub async fn run(args: SimulateArgs) -> Result<(), CliError> {
    let zones = load_geofence_file(&args.geofences)?;
    let track_json = fs::read_to_string(&args.track).map_err(|error| CliError::FileRead {
        path: args.track.display().to_string(),
        error,
    })?;
    let track = parse_track(&track_json)?;
    if track.is_empty() {
        return Err(CliError::Track("track contains no points".to_string()));
    }

    info!(
        zones = zones.len(),
        points = track.len(),
        interval_ms = args.interval_ms,
        "starting simulated feed"
    );

    let mut manager = GeofenceManager::new(zones);
    let mut cache = TileCache::with_capacity(args.max_tiles)?;
    let mut resources = MapResourceManager::new();
    resources.register_cleanup("position-feed", || debug!("position feed stopped"));

    let mut interval = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    let mut interrupted = false;

    for (i, point) in track.iter().enumerate() {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, tearing down");
                interrupted = true;
            }
            _ = interval.tick() => {
                step(i, *point, args.zoom, &mut manager, &mut cache);
            }
        }
        if interrupted {
            break;
        }
    }

    let stats = cache.stats();
    println!();
    println!("Replay finished:");
    println!("  Points:     {}", track.len());
    println!(
        "  Active:     {}",
        manager.active_ids().collect::<Vec<_>>().join(", ")
    );
    println!("  Tile cache: {} cached, {} max", cache.len(), cache.max_tiles());
    println!(
        "  Tiles:      {} reused, {} fetched, {} evicted ({:.0}% hit)",
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.hit_ratio() * 100.0
    );

    if let Err(e) = resources.cleanup() {
        warn!(error = %e, "teardown completed with failures");
    }
    Ok(())
}

/// Process one location update.
fn step(i: usize, point: TrackPoint, zoom: u8, manager: &mut GeofenceManager, cache: &mut TileCache) {
    for event in manager.check_events(point.latitude, point.longitude) {
        let verb = match event.kind {
            EventKind::Enter => "ENTER",
            EventKind::Exit => "EXIT ",
        };
        println!(
            "[{}] {} {} at ({:.5}, {:.5})",
            event.timestamp.format("%H:%M:%S"),
            verb,
            event.geofence_id,
            point.latitude,
            point.longitude
        );
    }

    match tile_at(point.latitude, point.longitude, zoom) {
        Ok(tile) => {
            let id = tile.to_string();
            let reused = cache.has_tile(&id);
            cache.add_tile(id.clone());
            debug!(point = i, tile = %id, reused, "viewport tile");
        }
        Err(e) => warn!(point = i, error = %e, "skipping tile bookkeeping"),
    }
}
