//! Static evaluation of single cells and whole positions.

use crate::board::player::Player;
use crate::board::pos::{Pos, CENTER};
use crate::board::Board;
use crate::cache;
use crate::pattern::PatternClassifier;
use lru::LruCache;

/// Opponent totals are weighted by 115% so the engine leans towards defence.
const DEFENSE_BIAS_PERCENT: i32 = 115;
/// Candidate quick scores weigh the opponent's gain by 110%.
const QUICK_SCORE_OPPONENT_PERCENT: i32 = 110;

type EvalKey = (Pos, Player, u64);

/// Owns the pattern classifier and a bounded cache of per-cell scores keyed by
/// (cell, player, board hash).
pub struct PositionEvaluator {
    classifier: PatternClassifier,
    cache: LruCache<EvalKey, i32>,
}

impl Default for PositionEvaluator {
    fn default() -> Self {
        Self::with_capacity(cache::EVAL_CACHE_CAPACITY)
    }
}

impl PositionEvaluator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            classifier: PatternClassifier::new(),
            cache: cache::bounded(capacity),
        }
    }

    pub fn classifier(&mut self) -> &mut PatternClassifier {
        &mut self.classifier
    }

    /// Positional weight: 8 at the center, one less per ring outward, doubled.
    pub fn positional_weight(pos: Pos) -> i32 {
        (8 - pos.distance(CENTER) as i32) * 2
    }

    /// Score of `player` having a stone on `pos`: the four line patterns through
    /// it plus the positional weight. Works for empty cells (hypothetical
    /// placement) and for the player's own stones alike.
    pub fn evaluate_move(&mut self, board: &Board, pos: Pos, player: Player) -> i32 {
        let key = (pos, player, board.hash());
        if let Some(&score) = self.cache.get(&key) {
            return score;
        }

        let score =
            self.classifier.line_score_at(board, pos, player) + Self::positional_weight(pos);
        self.cache.put(key, score);
        score
    }

    /// Move-ordering score: own gain plus 110% of what the cell is worth to the opponent.
    pub fn quick_score(&mut self, board: &Board, pos: Pos, player: Player) -> i32 {
        let own = self.evaluate_move(board, pos, player);
        let theirs = self.evaluate_move(board, pos, player.opposite());
        own + theirs * QUICK_SCORE_OPPONENT_PERCENT / 100
    }

    /// Whole-board score from `ai`'s point of view.
    pub fn evaluate_board(&mut self, board: &Board, ai: Player) -> i32 {
        let mut ai_total = 0;
        let mut opponent_total = 0;

        for pos in Pos::all() {
            match board.get(pos).player() {
                Some(owner) if owner == ai => ai_total += self.evaluate_move(board, pos, owner),
                Some(owner) => opponent_total += self.evaluate_move(board, pos, owner),
                None => {}
            }
        }

        ai_total - opponent_total * DEFENSE_BIAS_PERCENT / 100
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drops cached scores. The pattern cache is position independent and survives.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
