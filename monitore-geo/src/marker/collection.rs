//! Newest-first marker storage.

use super::MapMarker;

/// A collection of markers kept sorted newest-first.
///
/// Markers without a timestamp sort after all timestamped ones, preserving
/// their relative insertion order. The head of the collection is therefore
/// always the most recent report when any report carries a timestamp.
#[derive(Debug, Clone, Default)]
pub struct MarkerCollection {
    markers: Vec<MapMarker>,
}

impl MarkerCollection {
    /// Create a collection from an initial marker list.
    pub fn new(markers: Vec<MapMarker>) -> Self {
        let mut collection = Self { markers };
        collection.sort_newest_first();
        collection
    }

    /// Add a marker, keeping the newest-first order.
    pub fn add_marker(&mut self, marker: MapMarker) {
        self.markers.push(marker);
        self.sort_newest_first();
    }

    /// All markers, newest first.
    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    /// The most recent marker, if the collection is non-empty.
    pub fn most_recent(&self) -> Option<&MapMarker> {
        self.markers.first()
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// True when no markers are stored.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn sort_newest_first(&mut self) {
        // Stable sort: equal and missing timestamps keep insertion order.
        self.markers
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
}
