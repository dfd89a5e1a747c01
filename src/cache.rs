use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Cache capacities shared by the engine components.
pub const PATTERN_CACHE_CAPACITY: usize = 10_000;
pub const EVAL_CACHE_CAPACITY: usize = 50_000;
pub const TRANSPOSITION_TABLE_CAPACITY: usize = 100_000;
pub const PV_TABLE_CAPACITY: usize = 100_000;

/// An LRU cache holding at most `capacity` entries. A zero capacity means unbounded.
pub fn bounded<K: Hash + Eq, V>(capacity: usize) -> LruCache<K, V> {
    NonZeroUsize::new(capacity).map_or_else(LruCache::unbounded, LruCache::new)
}
