//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use monitore_geo::geofence::GeofenceError;
use monitore_geo::tile_cache::TileCacheError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to read an input file.
    FileRead { path: String, error: std::io::Error },
    /// Geofence configuration problem.
    Geofence(GeofenceError),
    /// Tile cache configuration problem.
    TileCache(TileCacheError),
    /// Track file problem.
    Track(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Geofence(GeofenceError::Config(_)) = self {
            eprintln!();
            eprintln!("The geofence file must be a JSON array of zone descriptors, e.g.:");
            eprintln!(
                "  [{{ \"id\": \"campus\", \"name\": \"Campus\", \"type\": \"circle\","
            );
            eprintln!(
                "     \"center\": {{ \"latitude\": 0.0, \"longitude\": 0.0 }}, \"radius\": 500.0 }}]"
            );
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read '{}': {}", path, error)
            }
            CliError::Geofence(e) => write!(f, "Geofence error: {}", e),
            CliError::TileCache(e) => write!(f, "Tile cache error: {}", e),
            CliError::Track(msg) => write!(f, "Track error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::FileRead { error, .. } => Some(error),
            CliError::Geofence(e) => Some(e),
            CliError::TileCache(e) => Some(e),
            CliError::Track(_) => None,
        }
    }
}

impl From<GeofenceError> for CliError {
    fn from(e: GeofenceError) -> Self {
        CliError::Geofence(e)
    }
}

impl From<TileCacheError> for CliError {
    fn from(e: TileCacheError) -> Self {
        CliError::TileCache(e)
    }
}
