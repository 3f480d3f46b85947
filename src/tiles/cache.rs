use crate::core::geo::TileCoord;
use lru::LruCache;
use std::num::NonZeroUsize;

/// In-memory tile store with least-recently-used eviction. Generic over what
/// is kept per tile: decoded pixels, or GPU textures on the UI side.
#[derive(Debug)]
pub struct TileCache<T> {
    cache: LruCache<TileCoord, T>,
}

impl<T> TileCache<T> {
    /// Cache holding at most `capacity` tiles (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Looks a tile up and marks it as recently used
    pub fn get(&mut self, coord: &TileCoord) -> Option<&T> {
        self.cache.get(coord)
    }

    pub fn insert(&mut self, coord: TileCoord, tile: T) {
        self.cache.put(coord, tile);
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.cache.contains(coord)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}
