//! Generic transposition table for caching search results.

use crate::cache;
use lru::LruCache;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TTEntry {
    pub score: i32,
    pub depth: u8,
    pub bound_type: BoundType,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum BoundType {
    Exact,
    Lower,
    Upper,
}

/// Outcome of a table lookup at a node.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TTLookup {
    /// The stored result settles this node.
    Cutoff(i32),
    /// The stored bound narrowed the window to `(alpha, beta)`.
    Window(i32, i32),
}

/// Bounded map from position hash to search result. Hash collisions are
/// accepted: two positions sharing a hash share an entry.
pub struct TranspositionTable {
    table: LruCache<u64, TTEntry>,
    hits: usize,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(cache::TRANSPOSITION_TABLE_CAPACITY)
    }
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: cache::bounded(capacity),
            hits: 0,
        }
    }

    pub fn store(&mut self, hash: u64, score: i32, depth: u8, bound_type: BoundType) {
        let entry = TTEntry {
            score,
            depth,
            bound_type,
        };

        // Always replace; the least recently used entry is evicted when full
        self.table.put(hash, entry);
    }

    /// Looks up `hash` for a search `depth` plies deep with window `(alpha, beta)`.
    /// Entries searched shallower than `depth` are ignored. An exact entry
    /// settles the node; a bound tightens the window and settles the node when
    /// the window closes.
    pub fn lookup(&mut self, hash: u64, depth: u8, alpha: i32, beta: i32) -> TTLookup {
        let entry = match self.table.get(&hash) {
            Some(entry) => *entry,
            None => return TTLookup::Window(alpha, beta),
        };

        if entry.depth < depth {
            return TTLookup::Window(alpha, beta);
        }

        let (alpha, beta) = match entry.bound_type {
            BoundType::Exact => {
                self.hits += 1;
                return TTLookup::Cutoff(entry.score);
            }
            BoundType::Lower => (alpha.max(entry.score), beta),
            BoundType::Upper => (alpha, beta.min(entry.score)),
        };

        if alpha >= beta {
            self.hits += 1;
            return TTLookup::Cutoff(entry.score);
        }
        TTLookup::Window(alpha, beta)
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.hits = 0;
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_entry_cuts_off() {
        let mut tt = TranspositionTable::new(16);
        tt.store(1, 42, 3, BoundType::Exact);
        assert_eq!(tt.lookup(1, 3, -100, 100), TTLookup::Cutoff(42));
        assert_eq!(tt.lookup(1, 2, -100, 100), TTLookup::Cutoff(42));
        assert_eq!(tt.hits(), 2);
    }

    #[test]
    fn test_shallow_entry_is_ignored() {
        let mut tt = TranspositionTable::new(16);
        tt.store(1, 42, 2, BoundType::Exact);
        assert_eq!(tt.lookup(1, 3, -100, 100), TTLookup::Window(-100, 100));
        assert_eq!(tt.hits(), 0);
    }

    #[test]
    fn test_lower_bound_raises_alpha() {
        let mut tt = TranspositionTable::new(16);
        tt.store(1, 10, 3, BoundType::Lower);
        assert_eq!(tt.lookup(1, 3, -100, 100), TTLookup::Window(10, 100));
        assert_eq!(tt.lookup(1, 3, -100, 5), TTLookup::Cutoff(10));
    }

    #[test]
    fn test_upper_bound_lowers_beta() {
        let mut tt = TranspositionTable::new(16);
        tt.store(1, -10, 3, BoundType::Upper);
        assert_eq!(tt.lookup(1, 3, -100, 100), TTLookup::Window(-100, -10));
        assert_eq!(tt.lookup(1, 3, 0, 100), TTLookup::Cutoff(-10));
    }

    #[test]
    fn test_store_overwrites_and_evicts() {
        let mut tt = TranspositionTable::new(2);
        tt.store(1, 1, 1, BoundType::Exact);
        tt.store(1, 2, 1, BoundType::Exact);
        assert_eq!(tt.lookup(1, 1, -100, 100), TTLookup::Cutoff(2));

        tt.store(2, 0, 1, BoundType::Exact);
        tt.store(3, 0, 1, BoundType::Exact);
        assert_eq!(tt.lookup(1, 1, -100, 100), TTLookup::Window(-100, 100));
        assert_eq!(tt.lookup(3, 1, -100, 100), TTLookup::Cutoff(0));
    }

    #[test]
    fn test_clear() {
        let mut tt = TranspositionTable::new(4);
        tt.store(1, 1, 1, BoundType::Exact);
        assert_eq!(tt.lookup(1, 1, -1, 1), TTLookup::Cutoff(1));
        tt.clear();
        assert_eq!(tt.hits(), 0);
        assert_eq!(tt.lookup(1, 1, -1, 1), TTLookup::Window(-1, 1));
    }
}
