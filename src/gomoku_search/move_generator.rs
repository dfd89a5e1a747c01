//! Candidate generation: a bounded set of cells worth searching.

use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};

use crate::alpha_beta_searcher::{MoveCollection, MoveGenerator};
use crate::board::pos::{Move, Pos, CENTER};

use super::implementation::GomokuState;

pub type GomokuMoveList = SmallVec<[Move; 32]>;

impl MoveCollection<Move> for GomokuMoveList {}

/// Cells further than this from every stone are never candidates.
pub const CANDIDATE_RADIUS: u8 = 2;
/// Largest threat set searched as is.
pub const MAX_THREAT_MOVES: usize = 15;

/// How many quick-scored candidates to keep for a board with `stone_count` stones.
pub fn candidate_cap(stone_count: usize) -> usize {
    match stone_count {
        0..=8 => 25,
        9..=20 => 20,
        21..=40 => 15,
        _ => 10,
    }
}

#[derive(Clone, Copy, Default, Debug)]
pub struct GomokuMoveGenerator;

impl GomokuMoveGenerator {
    /// Cells near the stones where either side would make an open three or
    /// better, in row-major order.
    pub fn threat_cells(&self, state: &mut GomokuState, nearby: &[Pos]) -> Vec<Pos> {
        let player = state.turn();
        let (board, evaluator) = state.board_and_evaluator();
        let classifier = evaluator.classifier();

        let mut threats = FxHashSet::default();
        for &pos in nearby {
            if classifier
                .counts_at(board, pos, player)
                .has_forcing_threat()
            {
                threats.insert(pos);
            }
            if classifier
                .counts_at(board, pos, player.opposite())
                .has_forcing_threat()
            {
                threats.insert(pos);
            }
        }

        nearby
            .iter()
            .copied()
            .filter(|pos| threats.contains(pos))
            .collect()
    }

    /// `cells` sorted by quick score for the side to move, best first. Ties keep
    /// their input order.
    fn sorted_by_quick_score(&self, state: &mut GomokuState, cells: &[Pos]) -> Vec<Pos> {
        let player = state.turn();
        let (board, evaluator) = state.board_and_evaluator();
        let mut scored: Vec<(i32, Pos)> = cells
            .iter()
            .map(|&pos| (evaluator.quick_score(board, pos, player), pos))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, pos)| pos).collect()
    }
}

impl MoveGenerator<GomokuState> for GomokuMoveGenerator {
    type Move = Move;
    type MoveList = GomokuMoveList;

    fn generate_moves(&self, state: &mut GomokuState) -> GomokuMoveList {
        let player = state.turn();
        if state.board().is_empty() {
            return smallvec![Move::new(CENTER, player)];
        }

        let nearby: Vec<Pos> = state.board().neighborhood(CANDIDATE_RADIUS).collect();
        if nearby.is_empty() {
            return GomokuMoveList::new();
        }

        let threats = self.threat_cells(state, &nearby);
        let cells = if !threats.is_empty() && threats.len() <= MAX_THREAT_MOVES {
            self.sorted_by_quick_score(state, &threats)
        } else {
            let mut cells = self.sorted_by_quick_score(state, &nearby);
            cells.truncate(candidate_cap(state.board().stone_count()));
            cells
        };

        cells
            .into_iter()
            .map(|pos| Move::new(pos, player))
            .collect()
    }
}
