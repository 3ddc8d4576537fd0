//! Geofence registry and enter/exit transition detection.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{Geofence, GeofenceError};

/// The direction of a containment transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The watched point moved into the zone.
    Enter,
    /// The watched point moved out of the zone.
    Exit,
}

/// One containment transition for one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceEvent {
    /// Id of the zone whose containment status changed.
    pub geofence_id: String,
    /// Enter or exit.
    pub kind: EventKind,
    /// When the transition was observed.
    pub timestamp: DateTime<Utc>,
}

/// Owns the zone set and computes enter/exit transitions for a moving point.
///
/// The active set (ids of zones currently containing the last-seen point)
/// is the only mutable state and is updated exclusively by
/// [`check_events`](Self::check_events). The manager holds no locks; hosts
/// that can invoke it from racing callbacks should use
/// [`SharedGeofenceManager`](super::SharedGeofenceManager).
#[derive(Debug, Default)]
pub struct GeofenceManager {
    /// Registered zones in insertion order, unique by id.
    geofences: Vec<Geofence>,
    /// Ids of zones containing the last-seen point. Always a subset of the
    /// registered ids.
    active: HashSet<String>,
}

impl GeofenceManager {
    /// Create a manager over an initial zone list (possibly empty).
    ///
    /// Ids must be unique; later duplicates are dropped with a warning,
    /// keeping the first registration. The configuration loader already
    /// rejects duplicates, so this only matters for hand-built lists. Use
    /// [`add_geofence`](Self::add_geofence) for checked insertion.
    pub fn new(geofences: Vec<Geofence>) -> Self {
        let mut seen = HashSet::with_capacity(geofences.len());
        let mut unique = Vec::with_capacity(geofences.len());
        for geofence in geofences {
            if seen.insert(geofence.id().to_string()) {
                unique.push(geofence);
            } else {
                warn!(id = geofence.id(), "duplicate geofence id dropped");
            }
        }
        Self {
            geofences: unique,
            active: HashSet::new(),
        }
    }

    /// Register a zone.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError::DuplicateId`] when a zone with the same id
    /// is already registered.
    pub fn add_geofence(&mut self, geofence: Geofence) -> Result<(), GeofenceError> {
        if self.geofences.iter().any(|g| g.id() == geofence.id()) {
            return Err(GeofenceError::DuplicateId(geofence.id().to_string()));
        }
        debug!(id = geofence.id(), "geofence registered");
        self.geofences.push(geofence);
        Ok(())
    }

    /// Remove a zone by id.
    ///
    /// Drops the id from the active set as well, preserving the invariant
    /// that the active set only references registered zones. Removing an
    /// unknown id is a no-op returning `false`, not an error.
    pub fn remove_geofence(&mut self, id: &str) -> bool {
        let before = self.geofences.len();
        self.geofences.retain(|g| g.id() != id);
        let removed = self.geofences.len() < before;
        if removed {
            self.active.remove(id);
            debug!(id, "geofence removed");
        }
        removed
    }

    /// Evaluate one location update and return the full transition batch.
    ///
    /// Runs synchronously: containment is evaluated against every zone, the
    /// result is diffed against the active set, and the active set is
    /// replaced before returning. Enter and exit events are emitted in zone
    /// insertion order, each stamped with the current time. A stationary
    /// point yields no events on repeated calls.
    pub fn check_events(&mut self, latitude: f64, longitude: f64) -> Vec<GeofenceEvent> {
        let timestamp = Utc::now();
        let mut events = Vec::new();
        let mut containing = HashSet::with_capacity(self.active.len());

        for geofence in &self.geofences {
            let inside = geofence.contains(latitude, longitude);
            let was_inside = self.active.contains(geofence.id());

            if inside {
                containing.insert(geofence.id().to_string());
            }

            let kind = match (was_inside, inside) {
                (false, true) => EventKind::Enter,
                (true, false) => EventKind::Exit,
                _ => continue,
            };
            debug!(id = geofence.id(), ?kind, latitude, longitude, "geofence transition");
            events.push(GeofenceEvent {
                geofence_id: geofence.id().to_string(),
                kind,
                timestamp,
            });
        }

        self.active = containing;
        events
    }

    /// Read-only view of the registered zones in insertion order.
    pub fn geofences(&self) -> &[Geofence] {
        &self.geofences
    }

    /// Ids of the zones containing the last-seen point.
    pub fn active_ids(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    /// Number of registered zones.
    pub fn len(&self) -> usize {
        self.geofences.len()
    }

    /// True when no zones are registered.
    pub fn is_empty(&self) -> bool {
        self.geofences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoPoint;

    fn circle(id: &str, lat: f64, lon: f64, radius_m: f64) -> Geofence {
        Geofence::circle(id, id.to_uppercase(), GeoPoint::new(lat, lon), radius_m).unwrap()
    }

    #[test]
    fn test_add_geofence_rejects_duplicate_id() {
        let mut manager = GeofenceManager::default();
        manager.add_geofence(circle("g1", 0.0, 0.0, 100.0)).unwrap();
        let err = manager
            .add_geofence(circle("g1", 10.0, 10.0, 200.0))
            .unwrap_err();
        assert!(matches!(err, GeofenceError::DuplicateId(id) if id == "g1"));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_new_drops_duplicate_ids_keeping_the_first() {
        let mut manager = GeofenceManager::new(vec![
            circle("g1", 0.0, 0.0, 1000.0),
            circle("g1", 50.0, 50.0, 1000.0),
            circle("g2", 0.0, 0.0, 2000.0),
        ]);
        assert_eq!(manager.len(), 2);

        // Only the first "g1" survives, so a point near the origin enters
        // each id exactly once.
        let events = manager.check_events(0.0, 0.0);
        let ids: Vec<_> = events.iter().map(|e| e.geofence_id.as_str()).collect();
        assert_eq!(ids, ["g1", "g2"]);
    }

    #[test]
    fn test_remove_unknown_geofence_is_noop() {
        let mut manager = GeofenceManager::default();
        assert!(!manager.remove_geofence("missing"));
    }

    #[test]
    fn test_enter_exit_scenario() {
        // The canonical sequence: enter at the center, no event while
        // stationary, exit when far away.
        let mut manager = GeofenceManager::new(vec![circle("g1", 0.0, 0.0, 1000.0)]);

        let events = manager.check_events(0.0, 0.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].geofence_id, "g1");
        assert_eq!(events[0].kind, EventKind::Enter);

        assert!(manager.check_events(0.0, 0.0).is_empty());

        let events = manager.check_events(10.0, 10.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].geofence_id, "g1");
        assert_eq!(events[0].kind, EventKind::Exit);
    }

    #[test]
    fn test_check_events_idempotent_for_stationary_point() {
        let mut manager = GeofenceManager::new(vec![
            circle("a", 0.0, 0.0, 5_000.0),
            circle("b", 0.0, 0.01, 5_000.0),
        ]);

        let first = manager.check_events(0.0, 0.005);
        assert_eq!(first.len(), 2);
        assert!(manager.check_events(0.0, 0.005).is_empty());
        assert!(manager.check_events(0.0, 0.005).is_empty());
    }

    #[test]
    fn test_overlapping_zones_sequence() {
        // G1 around the origin, G2 overlapping to the east.
        let mut manager = GeofenceManager::new(vec![
            circle("g1", 0.0, 0.0, 10_000.0),
            circle("g2", 0.0, 0.1, 10_000.0),
        ]);

        // Start outside both.
        assert!(manager.check_events(5.0, 5.0).is_empty());

        // Move inside G1 only.
        let events = manager.check_events(0.0, -0.02);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].geofence_id, "g1");
        assert_eq!(events[0].kind, EventKind::Enter);

        // Move into the overlap: enter G2, no event for G1.
        let events = manager.check_events(0.0, 0.05);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].geofence_id, "g2");
        assert_eq!(events[0].kind, EventKind::Enter);

        // Leave both: one exit each, insertion order.
        let events = manager.check_events(5.0, 5.0);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].geofence_id, "g1");
        assert_eq!(events[0].kind, EventKind::Exit);
        assert_eq!(events[1].geofence_id, "g2");
        assert_eq!(events[1].kind, EventKind::Exit);
    }

    #[test]
    fn test_events_follow_insertion_order() {
        let mut manager = GeofenceManager::default();
        for id in ["z", "a", "m"] {
            manager.add_geofence(circle(id, 0.0, 0.0, 1000.0)).unwrap();
        }

        let ids: Vec<_> = manager
            .check_events(0.0, 0.0)
            .into_iter()
            .map(|e| e.geofence_id)
            .collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn test_remove_active_geofence_drops_it_from_active_set() {
        let mut manager = GeofenceManager::new(vec![circle("g1", 0.0, 0.0, 1000.0)]);
        manager.check_events(0.0, 0.0);
        assert_eq!(manager.active_ids().count(), 1);

        manager.remove_geofence("g1");
        assert_eq!(manager.active_ids().count(), 0);

        // Re-adding and re-checking produces a fresh enter, not a stale
        // exit for the removed registration.
        manager.add_geofence(circle("g1", 0.0, 0.0, 1000.0)).unwrap();
        let events = manager.check_events(0.0, 0.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Enter);
    }

    #[test]
    fn test_active_set_subset_of_registered() {
        let mut manager = GeofenceManager::new(vec![
            circle("g1", 0.0, 0.0, 1000.0),
            circle("g2", 0.0, 0.0, 2000.0),
        ]);
        manager.check_events(0.0, 0.0);
        manager.remove_geofence("g2");

        let registered: Vec<_> = manager.geofences().iter().map(|g| g.id()).collect();
        for id in manager.active_ids() {
            assert!(registered.contains(&id));
        }
    }

    #[test]
    fn test_empty_manager_yields_no_events() {
        let mut manager = GeofenceManager::default();
        assert!(manager.check_events(0.0, 0.0).is_empty());
    }
}
