//! Viewport clustering of markers.

use chrono::{DateTime, Utc};

use crate::coord::world_pixel;

use super::{MapMarker, MarkerCollection};

/// Default grouping radius in screen pixels.
const DEFAULT_RADIUS_PX: f64 = 40.0;

/// The visible map region and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Center latitude in degrees.
    pub latitude: f64,
    /// Center longitude in degrees.
    pub longitude: f64,
    /// Zoom level (fractional zoom allowed).
    pub zoom: f64,
}

/// Clustering parameters.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Markers within this many screen pixels of a cluster seed join it.
    pub radius_px: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius_px: DEFAULT_RADIUS_PX,
        }
    }
}

/// A group of nearby markers rendered as one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Stable id within one calculation pass.
    pub id: String,
    /// Mean latitude of the member markers.
    pub latitude: f64,
    /// Mean longitude of the member markers.
    pub longitude: f64,
    /// Number of member markers.
    pub count: usize,
    /// The member markers, newest first.
    pub markers: Vec<MapMarker>,
    /// Newest member timestamp.
    pub timestamp: Option<DateTime<Utc>>,
    /// True for the single cluster holding the globally newest marker.
    pub is_recent: bool,
}

/// Groups markers per viewport for rendering.
///
/// Deterministic replacement for kd-tree clustering: markers are projected
/// to world pixels at the viewport zoom and greedily grouped against each
/// cluster's seed within a fixed pixel radius. Markers are visited newest
/// first, so the newest report always seeds its cluster.
#[derive(Debug, Default)]
pub struct ClusterManager {
    /// Snapshot of the markers, newest first.
    markers: Vec<MapMarker>,
    config: ClusterConfig,
    clusters: Vec<Cluster>,
}

impl ClusterManager {
    /// Create a manager over a marker collection snapshot.
    pub fn new(collection: &MarkerCollection) -> Self {
        Self::with_config(collection, ClusterConfig::default())
    }

    /// Create with custom clustering parameters.
    pub fn with_config(collection: &MarkerCollection, config: ClusterConfig) -> Self {
        Self {
            markers: collection.markers().to_vec(),
            config,
            clusters: Vec::new(),
        }
    }

    /// Recompute clusters for a viewport.
    ///
    /// Only markers inside the viewport bounding box take part. The box
    /// half-width is `0.1 · 2^(12 − zoom)` degrees, widening as the view
    /// zooms out.
    pub fn calculate_clusters(&mut self, viewport: &Viewport) {
        let delta = 0.1 * 2.0_f64.powf(12.0 - viewport.zoom);
        let lat_range = (viewport.latitude - delta)..=(viewport.latitude + delta);
        let lon_range = (viewport.longitude - delta)..=(viewport.longitude + delta);

        // Seed pixel position per cluster, parallel to self.clusters.
        let mut seeds: Vec<(f64, f64)> = Vec::new();
        self.clusters.clear();

        for marker in &self.markers {
            if !lat_range.contains(&marker.latitude) || !lon_range.contains(&marker.longitude) {
                continue;
            }
            let (px, py) = world_pixel(marker.latitude, marker.longitude, viewport.zoom);

            let joined = seeds
                .iter()
                .position(|(sx, sy)| (px - sx).hypot(py - sy) <= self.config.radius_px);

            match joined {
                Some(i) => {
                    let cluster = &mut self.clusters[i];
                    cluster.count += 1;
                    // Members arrive newest first; the seed's timestamp is
                    // already the newest in the cluster.
                    cluster.latitude += (marker.latitude - cluster.latitude) / cluster.count as f64;
                    cluster.longitude +=
                        (marker.longitude - cluster.longitude) / cluster.count as f64;
                    cluster.markers.push(marker.clone());
                }
                None => {
                    seeds.push((px, py));
                    self.clusters.push(Cluster {
                        id: format!("c{}", self.clusters.len()),
                        latitude: marker.latitude,
                        longitude: marker.longitude,
                        count: 1,
                        markers: vec![marker.clone()],
                        timestamp: marker.timestamp,
                        is_recent: false,
                    });
                }
            }
        }

        self.mark_most_recent();
        // Newest first, the recent cluster ahead of everything.
        self.clusters.sort_by(|a, b| {
            b.is_recent
                .cmp(&a.is_recent)
                .then(b.timestamp.cmp(&a.timestamp))
        });
    }

    /// The clusters from the last calculation, newest first.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// The cluster holding the globally newest marker, if any.
    pub fn most_recent_cluster(&self) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.is_recent)
    }

    fn mark_most_recent(&mut self) {
        let newest = self
            .clusters
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.timestamp.map(|t| (i, t)))
            .max_by_key(|&(_, t)| t)
            .map(|(i, _)| i);
        if let Some(i) = newest {
            self.clusters[i].is_recent = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn marker(lat: f64, lon: f64, minute: u32) -> MapMarker {
        MapMarker::new(lat, lon)
            .with_timestamp(Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap())
    }

    fn viewport() -> Viewport {
        Viewport {
            latitude: 0.0,
            longitude: 0.0,
            zoom: 12.0,
        }
    }

    #[test]
    fn test_nearby_markers_form_one_cluster() {
        // At zoom 12 one pixel is ~3.4e-4 degrees of longitude; these three
        // markers sit well inside a 40 px radius.
        let collection = MarkerCollection::new(vec![
            marker(0.0, 0.0, 1),
            marker(0.0005, 0.0005, 2),
            marker(-0.0005, 0.0005, 3),
        ]);
        let mut manager = ClusterManager::new(&collection);
        manager.calculate_clusters(&viewport());

        assert_eq!(manager.clusters().len(), 1);
        assert_eq!(manager.clusters()[0].count, 3);
    }

    #[test]
    fn test_distant_markers_stay_separate() {
        let collection = MarkerCollection::new(vec![
            marker(0.0, 0.0, 1),
            marker(0.05, 0.05, 2), // ~150 px away at zoom 12
        ]);
        let mut manager = ClusterManager::new(&collection);
        manager.calculate_clusters(&viewport());

        assert_eq!(manager.clusters().len(), 2);
        assert!(manager.clusters().iter().all(|c| c.count == 1));
    }

    #[test]
    fn test_markers_outside_viewport_are_skipped() {
        // delta at zoom 12 is 0.1°.
        let collection = MarkerCollection::new(vec![
            marker(0.0, 0.0, 1),
            marker(0.5, 0.5, 2), // outside the box
        ]);
        let mut manager = ClusterManager::new(&collection);
        manager.calculate_clusters(&viewport());

        assert_eq!(manager.clusters().len(), 1);
        assert_eq!(manager.clusters()[0].count, 1);
    }

    #[test]
    fn test_cluster_position_is_member_mean() {
        let collection = MarkerCollection::new(vec![
            marker(0.0, 0.0, 2),
            marker(0.001, 0.001, 1),
        ]);
        let mut manager = ClusterManager::new(&collection);
        manager.calculate_clusters(&viewport());

        let cluster = &manager.clusters()[0];
        assert_eq!(cluster.count, 2);
        assert!((cluster.latitude - 0.0005).abs() < 1e-9);
        assert!((cluster.longitude - 0.0005).abs() < 1e-9);
    }

    #[test]
    fn test_newest_cluster_is_flagged_recent_and_sorted_first() {
        let collection = MarkerCollection::new(vec![
            marker(0.0, 0.0, 1),
            marker(0.05, 0.05, 59), // newest, far from the first
        ]);
        let mut manager = ClusterManager::new(&collection);
        manager.calculate_clusters(&viewport());

        let first = &manager.clusters()[0];
        assert!(first.is_recent);
        assert_eq!(
            first.timestamp,
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 59, 0).unwrap())
        );
        assert_eq!(manager.most_recent_cluster().unwrap().id, first.id);
        assert_eq!(
            manager.clusters().iter().filter(|c| c.is_recent).count(),
            1
        );
    }

    #[test]
    fn test_cluster_timestamp_is_newest_member() {
        let collection = MarkerCollection::new(vec![
            marker(0.0, 0.0, 10),
            marker(0.0002, 0.0002, 45),
        ]);
        let mut manager = ClusterManager::new(&collection);
        manager.calculate_clusters(&viewport());

        assert_eq!(
            manager.clusters()[0].timestamp,
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 12, 45, 0).unwrap())
        );
    }

    #[test]
    fn test_recalculation_replaces_previous_pass() {
        let collection = MarkerCollection::new(vec![marker(0.0, 0.0, 1)]);
        let mut manager = ClusterManager::new(&collection);

        manager.calculate_clusters(&viewport());
        assert_eq!(manager.clusters().len(), 1);

        // Pan far away: nothing visible.
        manager.calculate_clusters(&Viewport {
            latitude: 40.0,
            longitude: 40.0,
            zoom: 12.0,
        });
        assert!(manager.clusters().is_empty());
        assert!(manager.most_recent_cluster().is_none());
    }

    #[test]
    fn test_empty_collection_yields_no_clusters() {
        let mut manager = ClusterManager::new(&MarkerCollection::default());
        manager.calculate_clusters(&viewport());
        assert!(manager.clusters().is_empty());
    }
}
