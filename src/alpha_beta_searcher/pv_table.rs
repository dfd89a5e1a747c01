//! Principal variation table: the best move found at each searched position.

use crate::cache;
use lru::LruCache;

/// Remembers the best move per position hash so the next, deeper iteration can
/// try it first.
pub struct PvTable<M> {
    table: LruCache<u64, M>,
}

impl<M: Clone> Default for PvTable<M> {
    fn default() -> Self {
        Self::new(cache::PV_TABLE_CAPACITY)
    }
}

impl<M: Clone> PvTable<M> {
    pub fn new(capacity: usize) -> Self {
        Self {
            table: cache::bounded(capacity),
        }
    }

    pub fn store(&mut self, hash: u64, best_move: M) {
        self.table.put(hash, best_move);
    }

    pub fn get(&mut self, hash: u64) -> Option<M> {
        self.table.get(&hash).cloned()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_get() {
        let mut pv = PvTable::new(8);
        assert!(pv.is_empty());
        pv.store(7, "a");
        pv.store(7, "b");
        assert_eq!(pv.get(7), Some("b"));
        assert_eq!(pv.get(8), None);
        assert_eq!(pv.len(), 1);
        pv.clear();
        assert!(pv.is_empty());
    }
}
