//! LRU cache for resident chunks
//!
//! Keeps chunk payloads in memory and evicts the least recently used chunk
//! once the configured limit is exceeded.

use std::collections::HashMap;
use std::sync::Arc;

use crate::streaming::chunk::Chunk;
use crate::streaming::coord::ChunkCoord;

/// LRU cache for chunks
///
/// Recency is tracked in a plain ordered list (oldest first). Touching or
/// removing a chunk scans that list, so each touch is O(n) in the number of
/// resident chunks. That is fine for limits up to a few hundred chunks; a
/// linked list with a hash index would be needed beyond that.
pub struct ChunkCache {
    /// Map of chunk coordinates to shared payloads
    chunks: HashMap<ChunkCoord, Arc<Chunk>>,
    /// Access order: oldest first, newest last
    access_order: Vec<ChunkCoord>,
    /// Maximum number of chunks to keep in cache
    max_chunks: usize,
}

impl ChunkCache {
    /// Create a new chunk cache with the given capacity
    ///
    /// # Arguments
    /// * `max_chunks` - Maximum number of chunks to keep in memory
    pub fn new(max_chunks: usize) -> Self {
        Self {
            chunks: HashMap::with_capacity(max_chunks + 1),
            access_order: Vec::with_capacity(max_chunks + 1),
            max_chunks,
        }
    }

    /// Get a chunk by coordinate, marking it most recently used
    pub fn get(&mut self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        if self.touch(coord) {
            self.chunks.get(&coord).cloned()
        } else {
            None
        }
    }

    /// Get a chunk without affecting recency
    pub fn peek(&self, coord: ChunkCoord) -> Option<&Arc<Chunk>> {
        self.chunks.get(&coord)
    }

    /// Mark a resident chunk as most recently used
    ///
    /// # Returns
    /// False if the chunk is not resident (nothing is tracked for it)
    pub fn touch(&mut self, coord: ChunkCoord) -> bool {
        if self.chunks.contains_key(&coord) {
            self.update_access_order(coord);
            true
        } else {
            false
        }
    }

    /// Insert a chunk into the cache under `coord`
    ///
    /// The chunk becomes most recently used, then least recently used chunks
    /// are evicted until the cache is back within capacity. A chunk already
    /// stored under `coord` is replaced.
    ///
    /// # Returns
    /// Coordinates evicted to make room (never includes `coord` itself
    /// unless the capacity is zero)
    pub fn insert(&mut self, coord: ChunkCoord, chunk: Arc<Chunk>) -> Vec<ChunkCoord> {
        self.chunks.insert(coord, chunk);
        self.update_access_order(coord);

        let mut evicted = Vec::new();
        while self.chunks.len() > self.max_chunks {
            match self.evict_oldest() {
                Some(old) => evicted.push(old),
                None => break,
            }
        }
        evicted
    }

    /// Remove a chunk from the cache
    ///
    /// # Returns
    /// The removed chunk if it existed
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.remove_from_access_order(coord);
        self.chunks.remove(&coord)
    }

    /// Check if the cache contains a chunk
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Get the number of chunks in the cache
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Maximum number of resident chunks
    pub fn capacity(&self) -> usize {
        self.max_chunks
    }

    /// Evict the oldest (least recently used) chunk
    ///
    /// # Returns
    /// Coordinate of the evicted chunk, or None if the cache was empty
    pub fn evict_oldest(&mut self) -> Option<ChunkCoord> {
        let coord = self.access_order.first().copied()?;
        self.remove(coord);
        Some(coord)
    }

    /// Drop every resident chunk
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.access_order.clear();
    }

    /// Coordinates in recency order, oldest first
    pub fn coords(&self) -> impl Iterator<Item = &ChunkCoord> {
        self.access_order.iter()
    }

    /// Update access order by moving a coordinate to the end (most recent)
    fn update_access_order(&mut self, coord: ChunkCoord) {
        self.remove_from_access_order(coord);
        self.access_order.push(coord);
    }

    /// Remove a coordinate from the access order
    fn remove_from_access_order(&mut self, coord: ChunkCoord) {
        if let Some(pos) = self.access_order.iter().position(|&c| c == coord) {
            self.access_order.remove(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_chunk(x: i32, y: i32) -> (ChunkCoord, Arc<Chunk>) {
        let coord = ChunkCoord::new(x, y);
        (coord, Arc::new(Chunk::new(coord)))
    }

    fn insert(cache: &mut ChunkCache, x: i32, y: i32) -> Vec<ChunkCoord> {
        let (coord, chunk) = make_chunk(x, y);
        cache.insert(coord, chunk)
    }

    #[test]
    fn test_cache_new() {
        let cache = ChunkCache::new(10);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 10);
    }

    #[test]
    fn test_cache_insert_and_get() {
        let mut cache = ChunkCache::new(10);
        insert(&mut cache, 1, 2);
        let coord = ChunkCoord::new(1, 2);

        assert_eq!(cache.len(), 1);
        assert!(cache.contains(coord));

        let retrieved = cache.get(coord);
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().coord, coord);
    }

    #[test]
    fn test_cache_insert_replace() {
        let mut cache = ChunkCache::new(10);
        insert(&mut cache, 1, 2);
        let evicted = insert(&mut cache, 1, 2);

        assert!(evicted.is_empty());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.coords().count(), 1);
    }

    #[test]
    fn test_cache_remove() {
        let mut cache = ChunkCache::new(10);
        insert(&mut cache, 1, 2);
        let coord = ChunkCoord::new(1, 2);

        let removed = cache.remove(coord);
        assert_eq!(removed.unwrap().coord, coord);
        assert_eq!(cache.len(), 0);
        assert!(!cache.contains(coord));
        assert_eq!(cache.coords().count(), 0);
    }

    #[test]
    fn test_cache_lru_eviction() {
        let mut cache = ChunkCache::new(3);

        insert(&mut cache, 1, 0);
        insert(&mut cache, 2, 0);
        insert(&mut cache, 3, 0);
        assert_eq!(cache.len(), 3);

        // 4th chunk pushes out the oldest
        let evicted = insert(&mut cache, 4, 0);
        assert_eq!(evicted, vec![ChunkCoord::new(1, 0)]);
        assert_eq!(cache.len(), 3);

        assert!(!cache.contains(ChunkCoord::new(1, 0)));
        assert!(cache.contains(ChunkCoord::new(2, 0)));
        assert!(cache.contains(ChunkCoord::new(3, 0)));
        assert!(cache.contains(ChunkCoord::new(4, 0)));
    }

    #[test]
    fn test_cache_lru_touch_order() {
        let mut cache = ChunkCache::new(3);

        insert(&mut cache, 1, 0);
        insert(&mut cache, 2, 0);
        insert(&mut cache, 3, 0);

        assert!(cache.touch(ChunkCoord::new(1, 0)));

        // (2, 0) is now the oldest
        let evicted = insert(&mut cache, 4, 0);
        assert_eq!(evicted, vec![ChunkCoord::new(2, 0)]);
        assert!(cache.contains(ChunkCoord::new(1, 0)));
    }

    #[test]
    fn test_cache_get_updates_order_peek_does_not() {
        let mut cache = ChunkCache::new(2);
        insert(&mut cache, 1, 0);
        insert(&mut cache, 2, 0);

        assert!(cache.peek(ChunkCoord::new(1, 0)).is_some());
        let evicted = insert(&mut cache, 3, 0);
        assert_eq!(evicted, vec![ChunkCoord::new(1, 0)]);

        cache.get(ChunkCoord::new(2, 0));
        let evicted = insert(&mut cache, 4, 0);
        assert_eq!(evicted, vec![ChunkCoord::new(3, 0)]);
    }

    #[test]
    fn test_touch_missing_is_not_tracked() {
        let mut cache = ChunkCache::new(2);
        assert!(!cache.touch(ChunkCoord::new(5, 5)));
        assert_eq!(cache.coords().count(), 0);
    }

    #[test]
    fn test_cache_evict_oldest() {
        let mut cache = ChunkCache::new(10);

        insert(&mut cache, 1, 0);
        insert(&mut cache, 2, 0);
        insert(&mut cache, 3, 0);

        assert_eq!(cache.evict_oldest(), Some(ChunkCoord::new(1, 0)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_empty_evict() {
        let mut cache = ChunkCache::new(10);
        assert!(cache.evict_oldest().is_none());
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = ChunkCache::new(4);
        insert(&mut cache, 1, 0);
        insert(&mut cache, 2, 0);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.coords().count(), 0);
    }

    #[test]
    fn test_coords_oldest_first() {
        let mut cache = ChunkCache::new(10);
        insert(&mut cache, 1, 0);
        insert(&mut cache, 2, 0);
        insert(&mut cache, 3, 0);
        cache.touch(ChunkCoord::new(1, 0));

        let coords: Vec<_> = cache.coords().copied().collect();
        assert_eq!(
            coords,
            vec![ChunkCoord::new(2, 0), ChunkCoord::new(3, 0), ChunkCoord::new(1, 0)]
        );
    }
}
