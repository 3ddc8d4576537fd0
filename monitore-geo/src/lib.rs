//! Monitore Geo - client-side spatial awareness for a live map view.
//!
//! This library provides the map-facing core of the Monitore student
//! location app: geofence containment and enter/exit detection, bounded
//! tile bookkeeping with deterministic LRU eviction, marker collections
//! with viewport clustering, and exactly-once teardown of map resources.
//!
//! # Architecture
//!
//! ```text
//! location feed ──► GeofenceManager::check_events ──► enter/exit events
//! viewport change ──► TileCache / ClusterManager  ──► fetch-or-reuse, clusters
//! view unmount ──► MapResourceManager::cleanup    ──► exactly-once release
//! ```
//!
//! All components are single-threaded and owned by the map view that
//! created them; nothing here is a process-wide singleton. Hosts that can
//! deliver racing location callbacks serialize through
//! [`geofence::SharedGeofenceManager`].

pub mod coord;
pub mod geofence;
pub mod marker;
pub mod resource;
pub mod tile_cache;

pub use coord::{GeoPoint, TileXY};
pub use geofence::{Geofence, GeofenceEvent, GeofenceManager};
pub use marker::{MapMarker, MarkerCollection};
pub use resource::MapResourceManager;
pub use tile_cache::TileCache;
