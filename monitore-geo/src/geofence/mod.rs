//! Geofencing: named geographic zones and enter/exit detection.
//!
//! A [`Geofence`] is an immutable value object describing one zone (circle
//! or polygon) with a pure containment test. The [`GeofenceManager`] owns a
//! set of zones, tracks which ones currently contain the watched point, and
//! diffs that set on every location update to produce enter/exit events.
//!
//! # Design
//!
//! - **Validate at construction**: malformed shapes are rejected when the
//!   `Geofence` is built, never at query time. `contains` is total.
//! - **Single mutable cell**: the manager's active set is updated only by
//!   [`GeofenceManager::check_events`], which runs synchronously and returns
//!   the full event batch for one point update.
//! - **Ownership over singletons**: the map view constructs and owns its
//!   manager instance and hands out events as plain data. Hosts that can
//!   race location callbacks wrap it in a [`SharedGeofenceManager`].
//!
//! # Example
//!
//! ```
//! use monitore_geo::coord::GeoPoint;
//! use monitore_geo::geofence::{Geofence, GeofenceManager, EventKind};
//!
//! let campus = Geofence::circle("campus", "Main Campus", GeoPoint::new(0.0, 0.0), 1000.0)?;
//! let mut manager = GeofenceManager::new(vec![campus]);
//!
//! let events = manager.check_events(0.0, 0.0);
//! assert_eq!(events[0].kind, EventKind::Enter);
//!
//! assert!(manager.check_events(0.0, 0.0).is_empty()); // stationary: no re-entry
//! # Ok::<(), monitore_geo::geofence::GeofenceError>(())
//! ```

mod config;
mod manager;
mod shape;
mod shared;

pub use config::{load_geofences, GeofenceDescriptor, ShapeDescriptor};
pub use manager::{EventKind, GeofenceEvent, GeofenceManager};
pub use shape::{Geofence, ZoneShape};
pub use shared::SharedGeofenceManager;

use thiserror::Error;

/// Errors from geofence construction and registration.
#[derive(Debug, Error)]
pub enum GeofenceError {
    /// The shape is malformed (non-positive circle radius, fewer than three
    /// polygon vertices, or non-finite coordinates).
    #[error("invalid geofence '{id}': {reason}")]
    InvalidGeofence { id: String, reason: String },

    /// A geofence with the same id is already registered.
    #[error("duplicate geofence id: '{0}'")]
    DuplicateId(String),

    /// The persisted geofence configuration could not be parsed.
    #[error("geofence configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
