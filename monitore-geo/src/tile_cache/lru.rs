//! Strict-LRU cache implementation.

use std::cell::Cell;
use std::collections::HashMap;

use tracing::trace;

use super::{TileCacheError, TileCacheStats};

/// Default capacity when none is configured.
pub const DEFAULT_MAX_TILES: usize = 200;

/// One slot in the recency list.
#[derive(Debug)]
struct Node {
    id: String,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Bounded cache of tile identifiers with strict least-recently-used
/// eviction.
///
/// Recency order lives in a doubly-linked list threaded through a slot
/// vector by index; the hashmap maps tile id to slot. All operations are
/// O(1) and single-threaded (the map view owns its cache instance).
#[derive(Debug)]
pub struct TileCache {
    max_tiles: usize,
    index: HashMap<String, usize>,
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    /// Most recently used slot.
    head: Option<usize>,
    /// Least recently used slot; the eviction candidate.
    tail: Option<usize>,
    hits: Cell<u64>,
    misses: Cell<u64>,
    evictions: u64,
}

impl Default for TileCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TileCache {
    /// Create a cache with the default capacity of [`DEFAULT_MAX_TILES`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_TILES).expect("default capacity is positive")
    }

    /// Create a cache bounded to `max_tiles` entries.
    ///
    /// # Errors
    ///
    /// Returns [`TileCacheError::InvalidCapacity`] when `max_tiles` is zero.
    pub fn with_capacity(max_tiles: usize) -> Result<Self, TileCacheError> {
        if max_tiles == 0 {
            return Err(TileCacheError::InvalidCapacity(max_tiles));
        }
        Ok(Self {
            max_tiles,
            index: HashMap::with_capacity(max_tiles),
            slots: Vec::with_capacity(max_tiles),
            free: Vec::new(),
            head: None,
            tail: None,
            hits: Cell::new(0),
            misses: Cell::new(0),
            evictions: 0,
        })
    }

    /// Membership probe. Does not affect recency.
    pub fn has_tile(&self, tile_id: &str) -> bool {
        let hit = self.index.contains_key(tile_id);
        if hit {
            self.hits.set(self.hits.get() + 1);
        } else {
            self.misses.set(self.misses.get() + 1);
        }
        hit
    }

    /// Record a tile as just used.
    ///
    /// Present tiles are promoted to most-recently-used. Absent tiles are
    /// inserted; at capacity, the least-recently-used tile is evicted first
    /// and its id returned.
    pub fn add_tile(&mut self, tile_id: impl Into<String>) -> Option<String> {
        let tile_id = tile_id.into();

        if let Some(&slot) = self.index.get(&tile_id) {
            self.unlink(slot);
            self.push_front(slot);
            return None;
        }

        let evicted = if self.index.len() == self.max_tiles {
            self.evict_oldest()
        } else {
            None
        };

        let node = Node {
            id: tile_id.clone(),
            prev: None,
            next: None,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.push_front(slot);
        self.index.insert(tile_id, slot);

        evicted
    }

    /// Drop all entries unconditionally. Stats counters are retained.
    pub fn clear(&mut self) {
        self.index.clear();
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Number of cached tile ids.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The configured capacity.
    pub fn max_tiles(&self) -> usize {
        self.max_tiles
    }

    /// Snapshot of the hit/miss/eviction counters.
    pub fn stats(&self) -> TileCacheStats {
        TileCacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            evictions: self.evictions,
        }
    }

    /// Remove and return the least-recently-used tile id.
    fn evict_oldest(&mut self) -> Option<String> {
        let slot = self.tail?;
        self.unlink(slot);
        let node = self.slots[slot].take().expect("tail slot is occupied");
        self.free.push(slot);
        self.index.remove(&node.id);
        self.evictions += 1;
        trace!(tile_id = %node.id, "tile evicted");
        Some(node.id)
    }

    /// Detach a slot from the recency list.
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.slots[slot].as_ref().expect("slot is occupied");
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.slots[p].as_mut().expect("linked slot").next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].as_mut().expect("linked slot").prev = prev,
            None => self.tail = prev,
        }

        let node = self.slots[slot].as_mut().expect("slot is occupied");
        node.prev = None;
        node.next = None;
    }

    /// Attach a detached slot at the most-recently-used end.
    fn push_front(&mut self, slot: usize) {
        let old_head = self.head;
        {
            let node = self.slots[slot].as_mut().expect("slot is occupied");
            node.prev = None;
            node.next = old_head;
        }
        if let Some(h) = old_head {
            self.slots[h].as_mut().expect("linked slot").prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    /// Tile ids from most to least recently used (test support).
    #[cfg(test)]
    fn recency_order(&self) -> Vec<&str> {
        let mut order = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = self.slots[slot].as_ref().expect("linked slot");
            order.push(node.id.as_str());
            cursor = node.next;
        }
        order
    }
}
