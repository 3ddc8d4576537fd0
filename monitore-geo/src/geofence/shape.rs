//! Geofence value object and containment tests.

use crate::coord::{haversine_m, GeoPoint};

use super::GeofenceError;

/// Tolerance for the polygon on-boundary test, in degrees (~0.1 mm).
const BOUNDARY_EPSILON_DEG: f64 = 1e-9;

/// The geometry of a zone.
///
/// Shapes are an exhaustive tagged union; containment matches on the
/// variant rather than sniffing optional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneShape {
    /// A circle defined by its center and radius in meters.
    Circle { center: GeoPoint, radius_m: f64 },
    /// A polygon over an ordered vertex ring, implicitly closed.
    Polygon { vertices: Vec<GeoPoint> },
}

/// One named geographic zone.
///
/// Immutable once constructed: validation happens in the constructors and
/// [`Geofence::contains`] is a pure function of the stored shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Geofence {
    id: String,
    name: String,
    shape: ZoneShape,
}

impl Geofence {
    /// Create a circular geofence.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::InvalidGeofence`] if the radius is not a
    /// finite positive number or the center has non-finite coordinates.
    pub fn circle(
        id: impl Into<String>,
        name: impl Into<String>,
        center: GeoPoint,
        radius_m: f64,
    ) -> Result<Self, GeofenceError> {
        let id = id.into();
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(GeofenceError::InvalidGeofence {
                id,
                reason: format!("circle radius must be positive, got {}", radius_m),
            });
        }
        if !center.is_finite() {
            return Err(GeofenceError::InvalidGeofence {
                id,
                reason: "circle center has non-finite coordinates".to_string(),
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            shape: ZoneShape::Circle { center, radius_m },
        })
    }

    /// Create a polygonal geofence from an ordered vertex ring.
    ///
    /// The ring is implicitly closed: the last vertex connects back to the
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::InvalidGeofence`] if fewer than three
    /// vertices are given or any vertex has non-finite coordinates.
    pub fn polygon(
        id: impl Into<String>,
        name: impl Into<String>,
        vertices: Vec<GeoPoint>,
    ) -> Result<Self, GeofenceError> {
        let id = id.into();
        if vertices.len() < 3 {
            return Err(GeofenceError::InvalidGeofence {
                id,
                reason: format!("polygon needs at least 3 vertices, got {}", vertices.len()),
            });
        }
        if let Some(bad) = vertices.iter().find(|v| !v.is_finite()) {
            return Err(GeofenceError::InvalidGeofence {
                id,
                reason: format!("polygon vertex has non-finite coordinates: {:?}", bad),
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            shape: ZoneShape::Polygon { vertices },
        })
    }

    /// The zone's unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The zone's human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The zone's geometry.
    pub fn shape(&self) -> &ZoneShape {
        &self.shape
    }

    /// Test whether a point lies inside the zone, boundary inclusive.
    ///
    /// Circles use great-circle (haversine) distance; Euclidean distance on
    /// raw degrees would be wrong away from the equator. Polygons use ray
    /// casting over the closed ring, with an explicit on-segment check so
    /// boundary points are deterministically contained.
    ///
    /// Non-finite query coordinates are never contained.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        if !latitude.is_finite() || !longitude.is_finite() {
            return false;
        }
        match &self.shape {
            ZoneShape::Circle { center, radius_m } => {
                haversine_m(*center, GeoPoint::new(latitude, longitude)) <= *radius_m
            }
            ZoneShape::Polygon { vertices } => {
                point_in_ring(latitude, longitude, vertices)
            }
        }
    }
}

/// Boundary-inclusive point-in-polygon over an implicitly closed ring.
fn point_in_ring(latitude: f64, longitude: f64, vertices: &[GeoPoint]) -> bool {
    let n = vertices.len();

    // Boundary pass first: a point on any edge is contained.
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        if on_segment(latitude, longitude, a, b) {
            return true;
        }
    }

    // Even-odd crossing count with longitude as x and latitude as y.
    let (x, y) = (longitude, latitude);
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (vertices[i].longitude, vertices[i].latitude);
        let (xj, yj) = (vertices[j].longitude, vertices[j].latitude);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// True when the point lies on the segment a-b within [`BOUNDARY_EPSILON_DEG`].
fn on_segment(latitude: f64, longitude: f64, a: GeoPoint, b: GeoPoint) -> bool {
    let (x, y) = (longitude, latitude);
    let (ax, ay) = (a.longitude, a.latitude);
    let (bx, by) = (b.longitude, b.latitude);

    let cross = (bx - ax) * (y - ay) - (by - ay) * (x - ax);
    if cross.abs() > BOUNDARY_EPSILON_DEG {
        return false;
    }
    x >= ax.min(bx) - BOUNDARY_EPSILON_DEG
        && x <= ax.max(bx) + BOUNDARY_EPSILON_DEG
        && y >= ay.min(by) - BOUNDARY_EPSILON_DEG
        && y <= ay.max(by) + BOUNDARY_EPSILON_DEG
}
