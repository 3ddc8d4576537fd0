//! Bounded tile bookkeeping with deterministic LRU eviction.
//!
//! The map-rendering layer consults this cache on every viewport change to
//! decide fetch vs. reuse, keyed by the canonical tile identifier
//! `"{zoom}/{x}/{y}"` (see [`crate::coord::TileXY`]). Keys are opaque
//! strings: human-readable in logs and flexible for any tiling scheme.
//!
//! # Design
//!
//! - **Strict LRU**: recency is a total order maintained in a hashmap plus
//!   an index-based doubly-linked list, giving O(1) touch and O(1)
//!   evict-oldest. Eviction is fully deterministic; an unordered set cannot
//!   express this, and approximate policies (TinyLFU et al.) trade the
//!   determinism away.
//! - **Membership is not recency**: [`TileCache::has_tile`] probes without
//!   promoting, so render-loop existence checks don't distort the eviction
//!   order. Only [`TileCache::add_tile`] touches.
//! - **Snapshot stats**: hit/miss/eviction counters are read out as a
//!   point-in-time [`TileCacheStats`] copy.
//!
//! # Example
//!
//! ```
//! use monitore_geo::tile_cache::TileCache;
//!
//! let mut cache = TileCache::with_capacity(2)?;
//! cache.add_tile("16/100/200");
//! cache.add_tile("16/100/201");
//! cache.add_tile("16/100/200");              // refresh recency
//! let evicted = cache.add_tile("16/100/202"); // over capacity
//! assert_eq!(evicted.as_deref(), Some("16/100/201"));
//! assert!(cache.has_tile("16/100/200"));
//! # Ok::<(), monitore_geo::tile_cache::TileCacheError>(())
//! ```

mod lru;

pub use lru::{TileCache, DEFAULT_MAX_TILES};

use thiserror::Error;

/// Errors from tile cache construction.
#[derive(Debug, Error, PartialEq)]
pub enum TileCacheError {
    /// The requested capacity is not a positive integer.
    #[error("invalid tile cache capacity: {0} (must be positive)")]
    InvalidCapacity(usize),
}

/// Point-in-time cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileCacheStats {
    /// Membership probes that found the tile.
    pub hits: u64,
    /// Membership probes that missed.
    pub misses: u64,
    /// Tiles evicted to make room.
    pub evictions: u64,
}

impl TileCacheStats {
    /// Hit ratio over all probes, or 0 when nothing was probed.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
