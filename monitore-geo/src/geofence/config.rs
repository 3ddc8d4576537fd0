//! Persisted geofence descriptors.
//!
//! Zones are stored by the host application as JSON in the shape the
//! backend persists them:
//!
//! ```json
//! [
//!   { "id": "campus", "name": "Main Campus", "type": "circle",
//!     "center": { "latitude": 0.0, "longitude": 0.0 }, "radius": 500.0 },
//!   { "id": "park", "name": "City Park", "type": "polygon",
//!     "coordinates": [ { "latitude": 0.0, "longitude": 0.0 }, ... ] }
//! ]
//! ```
//!
//! Descriptors are untrusted input: conversion into [`Geofence`] runs the
//! same shape validation as the constructors, so a malformed descriptor
//! never produces a queryable zone.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::coord::GeoPoint;

use super::{Geofence, GeofenceError};

/// The persisted geometry of a zone, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDescriptor {
    /// Circle with a center point and radius in meters.
    Circle { center: GeoPoint, radius: f64 },
    /// Polygon over an ordered vertex list, implicitly closed.
    Polygon { coordinates: Vec<GeoPoint> },
}

/// One persisted zone definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceDescriptor {
    /// Unique zone id.
    pub id: String,
    /// Human-readable zone name.
    pub name: String,
    /// Geometry, flattened into the same JSON object.
    #[serde(flatten)]
    pub shape: ShapeDescriptor,
}

impl TryFrom<GeofenceDescriptor> for Geofence {
    type Error = GeofenceError;

    fn try_from(descriptor: GeofenceDescriptor) -> Result<Self, Self::Error> {
        match descriptor.shape {
            ShapeDescriptor::Circle { center, radius } => {
                Geofence::circle(descriptor.id, descriptor.name, center, radius)
            }
            ShapeDescriptor::Polygon { coordinates } => {
                Geofence::polygon(descriptor.id, descriptor.name, coordinates)
            }
        }
    }
}

/// Parse and validate a JSON array of zone descriptors.
///
/// # Errors
///
/// - [`GeofenceError::Config`] when the JSON does not parse.
/// - [`GeofenceError::InvalidGeofence`] when a descriptor fails shape
///   validation.
/// - [`GeofenceError::DuplicateId`] when two descriptors share an id.
pub fn load_geofences(json: &str) -> Result<Vec<Geofence>, GeofenceError> {
    let descriptors: Vec<GeofenceDescriptor> = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    let mut geofences = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        if !seen.insert(descriptor.id.clone()) {
            return Err(GeofenceError::DuplicateId(descriptor.id));
        }
        geofences.push(Geofence::try_from(descriptor)?);
    }
    Ok(geofences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geofence::ZoneShape;

    const SAMPLE: &str = r#"[
        { "id": "campus", "name": "Main Campus", "type": "circle",
          "center": { "latitude": -23.5505, "longitude": -46.6333 }, "radius": 500.0 },
        { "id": "park", "name": "City Park", "type": "polygon",
          "coordinates": [
            { "latitude": 0.0, "longitude": 0.0 },
            { "latitude": 0.0, "longitude": 1.0 },
            { "latitude": 1.0, "longitude": 0.5 }
          ] }
    ]"#;

    #[test]
    fn test_load_geofences_parses_both_shapes() {
        let zones = load_geofences(SAMPLE).unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].id(), "campus");
        assert!(matches!(zones[0].shape(), ZoneShape::Circle { .. }));
        assert_eq!(zones[1].name(), "City Park");
        assert!(matches!(zones[1].shape(), ZoneShape::Polygon { .. }));
    }

    #[test]
    fn test_load_geofences_rejects_malformed_json() {
        let err = load_geofences("not json").unwrap_err();
        assert!(matches!(err, GeofenceError::Config(_)));
    }

    #[test]
    fn test_load_geofences_rejects_invalid_shape() {
        let json = r#"[
            { "id": "bad", "name": "Bad", "type": "circle",
              "center": { "latitude": 0.0, "longitude": 0.0 }, "radius": -1.0 }
        ]"#;
        let err = load_geofences(json).unwrap_err();
        assert!(matches!(err, GeofenceError::InvalidGeofence { .. }));
    }

    #[test]
    fn test_load_geofences_rejects_duplicate_ids() {
        let json = r#"[
            { "id": "dup", "name": "A", "type": "circle",
              "center": { "latitude": 0.0, "longitude": 0.0 }, "radius": 10.0 },
            { "id": "dup", "name": "B", "type": "circle",
              "center": { "latitude": 1.0, "longitude": 1.0 }, "radius": 10.0 }
        ]"#;
        let err = load_geofences(json).unwrap_err();
        assert!(matches!(err, GeofenceError::DuplicateId(id) if id == "dup"));
    }

    #[test]
    fn test_descriptor_round_trips_through_json() {
        let descriptor = GeofenceDescriptor {
            id: "campus".to_string(),
            name: "Main Campus".to_string(),
            shape: ShapeDescriptor::Circle {
                center: GeoPoint::new(1.5, -2.5),
                radius: 250.0,
            },
        };
        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(json.contains(r#""type":"circle""#));
        let back: GeofenceDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}
