//! History heuristic for gomoku move ordering.
//!
//! Tracks which cells cause cutoffs, using this information to improve move
//! ordering. Cells that frequently cause cutoffs are tried before cells that
//! rarely do.

use crate::board::pos::{Pos, BOARD_SIZE};

/// Per-cell cutoff weights. Lives for one engine turn.
#[derive(Clone)]
pub struct HistoryTable {
    table: [[u32; BOARD_SIZE]; BOARD_SIZE],
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            table: [[0; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Records that a stone on `pos` caused a cutoff `depth` plies from the horizon.
    pub fn record_cutoff(&mut self, pos: Pos, depth: u8) {
        // Weight by depth: deeper cutoffs are more significant
        let bonus = depth as u32 * depth as u32;
        let entry = &mut self.table[pos.row as usize][pos.col as usize];
        *entry = entry.saturating_add(bonus);
    }

    #[inline]
    pub fn score(&self, pos: Pos) -> u32 {
        self.table[pos.row as usize][pos.col as usize]
    }

    pub fn clear(&mut self) {
        self.table = [[0; BOARD_SIZE]; BOARD_SIZE];
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}
