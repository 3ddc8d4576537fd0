//! Map markers: timestamp-ordered collections and viewport clustering.
//!
//! Location reports render as markers on the live map. The collection keeps
//! them newest-first so the most recent report is always cheap to find and
//! to highlight; the cluster manager groups nearby markers per viewport so
//! dense areas render as counts instead of overlapping pins.

mod cluster;
mod collection;

pub use cluster::{Cluster, ClusterConfig, ClusterManager, Viewport};
pub use collection::MarkerCollection;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Popup content attached to a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPopup {
    /// Optional popup title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Popup body text.
    pub content: String,
}

/// One rendered location report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Optional marker color (CSS color string).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Optional popup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup: Option<MarkerPopup>,
    /// When the report was recorded; drives newest-first ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl MapMarker {
    /// Create a bare marker at a position.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            color: None,
            popup: None,
            timestamp: None,
        }
    }

    /// Attach a timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
