//! Mutex-serialized wrapper for hosts with racing location callbacks.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Geofence, GeofenceError, GeofenceEvent, GeofenceManager};

/// A cloneable, mutex-guarded [`GeofenceManager`].
///
/// The core manager is single-threaded by design. When the host platform
/// can deliver geolocation callbacks concurrently, this wrapper serializes
/// access so each `check_events` call still observes and replaces the
/// active set atomically, preserving the enter/exit invariant.
///
/// `parking_lot::Mutex` is used over `std` for its smaller footprint and
/// poison-free locking; a panicking containment test cannot exist (shapes
/// are validated at construction), so poisoning has nothing to guard.
#[derive(Debug, Clone, Default)]
pub struct SharedGeofenceManager {
    inner: Arc<Mutex<GeofenceManager>>,
}

impl SharedGeofenceManager {
    /// Wrap a manager for shared use.
    pub fn new(manager: GeofenceManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Serialized [`GeofenceManager::check_events`].
    pub fn check_events(&self, latitude: f64, longitude: f64) -> Vec<GeofenceEvent> {
        self.inner.lock().check_events(latitude, longitude)
    }

    /// Serialized [`GeofenceManager::add_geofence`].
    pub fn add_geofence(&self, geofence: Geofence) -> Result<(), GeofenceError> {
        self.inner.lock().add_geofence(geofence)
    }

    /// Serialized [`GeofenceManager::remove_geofence`].
    pub fn remove_geofence(&self, id: &str) -> bool {
        self.inner.lock().remove_geofence(id)
    }

    /// Run a closure against the locked manager.
    ///
    /// For multi-step reads (e.g. listing zones and active ids together)
    /// that must observe one consistent state.
    pub fn with<R>(&self, f: impl FnOnce(&mut GeofenceManager) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoPoint;
    use crate::geofence::EventKind;
    use std::thread;

    fn circle(id: &str, radius_m: f64) -> Geofence {
        Geofence::circle(id, id, GeoPoint::new(0.0, 0.0), radius_m).unwrap()
    }

    #[test]
    fn test_shared_manager_round_trip() {
        let shared = SharedGeofenceManager::new(GeofenceManager::new(vec![circle("g1", 1000.0)]));

        let events = shared.check_events(0.0, 0.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Enter);
        assert!(shared.check_events(0.0, 0.0).is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedGeofenceManager::default();
        let other = shared.clone();
        other.add_geofence(circle("g1", 1000.0)).unwrap();

        assert_eq!(shared.with(|m| m.len()), 1);
        assert!(shared.remove_geofence("g1"));
        assert_eq!(other.with(|m| m.len()), 0);
    }

    #[test]
    fn test_concurrent_checks_never_double_report() {
        // Two racing callers checking the same stationary point: exactly
        // one of them may observe the enter transition.
        let shared = SharedGeofenceManager::new(GeofenceManager::new(vec![circle("g1", 1000.0)]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.check_events(0.0, 0.0).len())
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 1, "enter event must be reported exactly once");
    }
}
