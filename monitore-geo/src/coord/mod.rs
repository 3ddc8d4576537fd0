//! Geographic coordinate math.
//!
//! Shared primitives for the spatial-awareness core: WGS84 points,
//! great-circle distance, and Web Mercator projections used for tile
//! addressing and pixel-space clustering.
//!
//! # Design
//!
//! - Distance is always haversine on a spherical earth. Euclidean distance
//!   on raw degrees shrinks east-west with latitude and is wrong everywhere
//!   except the equator.
//! - Tile addressing follows the slippy-map convention: `x` grows eastward,
//!   `y` grows southward, `2^zoom` tiles per axis.
//! - Validation happens at the entry points (`tile_at`); the pure projection
//!   helpers are total over finite input.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum latitude representable in Web Mercator (degrees).
pub const MIN_LAT: f64 = -85.05112878;

/// Maximum latitude representable in Web Mercator (degrees).
pub const MAX_LAT: f64 = 85.05112878;

/// Minimum longitude (degrees).
pub const MIN_LON: f64 = -180.0;

/// Maximum longitude (degrees).
pub const MAX_LON: f64 = 180.0;

/// Maximum supported tile zoom level.
pub const MAX_ZOOM: u8 = 19;

/// Mean earth radius in meters, used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Rendered tile edge length in pixels.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Errors from coordinate validation.
#[derive(Debug, Error, PartialEq)]
pub enum CoordError {
    /// Latitude outside the Web Mercator range.
    #[error("invalid latitude: {0} (must be within ±{MAX_LAT})")]
    InvalidLatitude(f64),

    /// Longitude outside ±180°.
    #[error("invalid longitude: {0} (must be within ±180)")]
    InvalidLongitude(f64),

    /// Zoom level beyond the supported maximum.
    #[error("invalid zoom: {0} (max: {MAX_ZOOM})")]
    InvalidZoom(u8),
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point from latitude/longitude degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// A slippy-map tile address.
///
/// The `Display` form, `"{zoom}/{x}/{y}"`, is the canonical tile identifier
/// used as the tile cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileXY {
    /// Column index, 0 at the antimeridian, growing eastward.
    pub x: u32,
    /// Row index, 0 at the north edge, growing southward.
    pub y: u32,
    /// Zoom level.
    pub zoom: u8,
}

impl fmt::Display for TileXY {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Great-circle distance between two points in meters.
///
/// Standard haversine formula over a spherical earth. Accurate to ~0.5%
/// against the WGS84 ellipsoid, which is ample for geofence radii.
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Resolve the tile containing a geographic position.
///
/// # Errors
///
/// Returns `CoordError` when the latitude is outside the Web Mercator
/// range, the longitude is outside ±180°, or the zoom exceeds [`MAX_ZOOM`].
pub fn tile_at(latitude: f64, longitude: f64, zoom: u8) -> Result<TileXY, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
        return Err(CoordError::InvalidLatitude(latitude));
    }
    if !(MIN_LON..=MAX_LON).contains(&longitude) {
        return Err(CoordError::InvalidLongitude(longitude));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let n = (1u32 << zoom) as f64;
    let (px, py) = mercator_unit(latitude, longitude);

    // Clamp so the east/south edges (lon = 180, lat = MIN_LAT) land in the
    // last tile instead of one past it.
    let x = ((px * n) as u32).min((1u32 << zoom) - 1);
    let y = ((py * n) as u32).min((1u32 << zoom) - 1);

    Ok(TileXY { x, y, zoom })
}

/// Project a position to global pixel coordinates at a zoom level.
///
/// Pixel space spans `256 · 2^zoom` pixels per axis. Latitude is clamped to
/// the Web Mercator range so the projection stays total; this is the basis
/// for pixel-radius marker clustering.
pub fn world_pixel(latitude: f64, longitude: f64, zoom: f64) -> (f64, f64) {
    let lat = latitude.clamp(MIN_LAT, MAX_LAT);
    let (px, py) = mercator_unit(lat, longitude);
    let scale = TILE_SIZE_PX * 2.0_f64.powf(zoom);
    (px * scale, py * scale)
}

/// Web Mercator projection onto the unit square.
fn mercator_unit(latitude: f64, longitude: f64) -> (f64, f64) {
    let x = (longitude + 180.0) / 360.0;
    let lat_rad = latitude * PI / 180.0;
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0;
    (x, y)
}
