//! Bounded search-result cache.
//!
//! Maps a normalized query to the dataset positions it matched. Reads use
//! [`LruCache::peek`] and keys are only ever inserted once, so the eviction order of
//! the underlying LRU list is the insertion order: the oldest search goes first.

use std::num::NonZeroUsize;

use fxhash::FxBuildHasher;
use lru::LruCache;
use serde::Serialize;
use tracing::debug;

/// Default number of cached searches.
pub const DEFAULT_SEARCH_CACHE_CAPACITY: usize = 50;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_SEARCH_CACHE_CAPACITY) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

/// Counters describing cache behavior since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

pub struct SearchCache {
    entries: LruCache<String, Vec<usize>, FxBuildHasher>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl SearchCache {
    /// A capacity of zero falls back to [`DEFAULT_SEARCH_CACHE_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
        Self {
            entries: LruCache::with_hasher(capacity, FxBuildHasher::default()),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up a previous result without changing eviction order.
    pub fn get(&mut self, key: &str) -> Option<Vec<usize>> {
        match self.entries.peek(key) {
            Some(positions) => {
                self.hits += 1;
                debug!(key, matches = positions.len(), "search cache hit");
                Some(positions.clone())
            }
            None => {
                self.misses += 1;
                debug!(key, "search cache miss");
                None
            }
        }
    }

    /// Store a result, evicting the oldest entry when full.
    ///
    /// Re-storing an existing key replaces its value in place and keeps its age.
    pub fn put(&mut self, key: String, positions: Vec<usize>) {
        if let Some(existing) = self.entries.peek_mut(&key) {
            *existing = positions;
            return;
        }
        if let Some((evicted, _)) = self.entries.push(key, positions) {
            self.evictions += 1;
            debug!(evicted = %evicted, "search cache evicted oldest entry");
        }
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            debug!(entries = self.entries.len(), "search cache cleared");
        }
        self.entries.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            entries: self.entries.len(),
        }
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_CACHE_CAPACITY)
    }
}

impl std::fmt::Debug for SearchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCache")
            .field("capacity", &self.capacity())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_falls_back_to_default() {
        assert_eq!(SearchCache::new(0).capacity(), DEFAULT_SEARCH_CACHE_CAPACITY);
        assert_eq!(SearchCache::new(3).capacity(), 3);
    }

    #[test]
    fn evicts_in_insertion_order_even_after_reads() {
        let mut cache = SearchCache::new(2);
        cache.put("a".into(), vec![0]);
        cache.put("b".into(), vec![1]);
        // Reading "a" must not protect it from eviction.
        assert_eq!(cache.get("a"), Some(vec![0]));
        cache.put("c".into(), vec![2]);
        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn replacing_a_key_keeps_its_age() {
        let mut cache = SearchCache::new(2);
        cache.put("a".into(), vec![0]);
        cache.put("b".into(), vec![1]);
        cache.put("a".into(), vec![5]);
        cache.put("c".into(), vec![2]);
        assert!(!cache.contains("a"));
        assert_eq!(cache.get("b"), Some(vec![1]));
    }

    #[test]
    fn stats_track_hits_and_misses() {
        let mut cache = SearchCache::default();
        assert!(cache.get("x").is_none());
        cache.put("x".into(), vec![]);
        assert_eq!(cache.get("x"), Some(vec![]));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
    }

    #[test]
    fn clear_empties_but_keeps_counters() {
        let mut cache = SearchCache::default();
        cache.put("x".into(), vec![1]);
        cache.get("x");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 1);
    }
}
