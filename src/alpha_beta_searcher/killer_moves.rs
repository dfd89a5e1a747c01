//! Killer move storage.

/// Killer moves are quiet moves that caused cutoffs at the same ply in other
/// branches of the search tree. Storing them per-ply improves move ordering by
/// prioritizing moves likely to cause cutoffs.
pub(crate) struct KillerMoves<M> {
    slots: Vec<[Option<M>; 2]>,
}

impl<M: Clone + PartialEq> KillerMoves<M> {
    pub fn new(max_ply: u8) -> Self {
        Self {
            slots: (0..=max_ply as usize).map(|_| [None, None]).collect(),
        }
    }

    /// Grows the table so plies up to `max_ply` can be stored.
    pub fn ensure_capacity(&mut self, max_ply: u8) {
        while self.slots.len() <= max_ply as usize {
            self.slots.push([None, None]);
        }
    }

    pub fn store(&mut self, ply: u8, killer: M) {
        if let Some(slot) = self.slots.get_mut(ply as usize) {
            if slot[0].as_ref() == Some(&killer) {
                return;
            }
            slot[1] = slot[0].take();
            slot[0] = Some(killer);
        }
    }

    pub fn get(&self, ply: u8) -> [Option<M>; 2] {
        self.slots
            .get(ply as usize)
            .cloned()
            .unwrap_or([None, None])
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = [None, None];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_shifts_previous_killer() {
        let mut killers = KillerMoves::new(4);
        killers.store(2, 'a');
        killers.store(2, 'b');
        assert_eq!(killers.get(2), [Some('b'), Some('a')]);

        killers.store(2, 'c');
        assert_eq!(killers.get(2), [Some('c'), Some('b')]);
    }

    #[test]
    fn test_store_ignores_duplicate() {
        let mut killers = KillerMoves::new(4);
        killers.store(1, 'a');
        killers.store(1, 'a');
        assert_eq!(killers.get(1), [Some('a'), None]);
    }

    #[test]
    fn test_plies_are_independent() {
        let mut killers = KillerMoves::new(4);
        killers.store(0, 'a');
        killers.store(3, 'z');
        assert_eq!(killers.get(0), [Some('a'), None]);
        assert_eq!(killers.get(3), [Some('z'), None]);
        assert_eq!(killers.get(1), [None, None]);
    }

    #[test]
    fn test_out_of_range_ply() {
        let mut killers = KillerMoves::new(2);
        killers.store(9, 'a');
        assert_eq!(killers.get(9), [None, None]);
        killers.ensure_capacity(9);
        killers.store(9, 'a');
        assert_eq!(killers.get(9), [Some('a'), None]);
    }

    #[test]
    fn test_clear() {
        let mut killers = KillerMoves::new(2);
        killers.store(1, 'a');
        killers.clear();
        assert_eq!(killers.get(1), [None, None]);
    }
}
