//! CLI subcommands.

pub mod check;
pub mod simulate;

use std::fs;
use std::path::Path;

use monitore_geo::geofence::{load_geofences, Geofence};

use crate::error::CliError;

/// Read and validate a geofence configuration file.
pub fn load_geofence_file(path: &Path) -> Result<Vec<Geofence>, CliError> {
    let json = fs::read_to_string(path).map_err(|error| CliError::FileRead {
        path: path.display().to_string(),
        error,
    })?;
    Ok(load_geofences(&json)?)
}
