//! Gomoku move ordering for improved alpha-beta pruning.

use crate::alpha_beta_searcher::{MoveOrderer, OrderingHints};
use crate::board::pos::Move;
use crate::pattern::PatternCounts;

use super::implementation::GomokuState;

pub const PV_BONUS: i32 = 100_000;
pub const KILLER_BONUS: i32 = 10_000;
pub const OPEN_FOUR_BONUS: i32 = 50_000;
pub const CLOSED_FOUR_BONUS: i32 = 30_000;
pub const OPEN_THREE_BONUS: i32 = 15_000;

/// Bonus for the strongest shape a placement creates.
fn tactical_bonus(counts: &PatternCounts) -> i32 {
    if counts.open_four > 0 {
        OPEN_FOUR_BONUS
    } else if counts.closed_four > 0 {
        CLOSED_FOUR_BONUS
    } else if counts.open_three > 0 {
        OPEN_THREE_BONUS
    } else {
        0
    }
}

/// Orders placements by quick score plus bonuses for the PV move, killer moves,
/// history weight and the shape the placement makes.
#[derive(Clone, Copy, Default, Debug)]
pub struct GomokuMoveOrderer;

impl GomokuMoveOrderer {
    pub fn priority(&self, mv: &Move, state: &mut GomokuState, hints: &OrderingHints<Move>) -> i32 {
        let (board, evaluator) = state.board_and_evaluator();
        let mut priority = evaluator.quick_score(board, mv.pos, mv.player);
        priority += tactical_bonus(&evaluator.classifier().counts_at(board, mv.pos, mv.player));

        if hints.pv_move == Some(mv) {
            priority += PV_BONUS;
        }
        if hints.killers.iter().any(|killer| killer.as_ref() == Some(mv)) {
            priority += KILLER_BONUS;
        }
        priority.saturating_add(state.history().score(mv.pos).min(i32::MAX as u32) as i32)
    }
}

impl MoveOrderer<GomokuState, Move> for GomokuMoveOrderer {
    fn order_moves(&self, moves: &mut [Move], state: &mut GomokuState, hints: &OrderingHints<Move>) {
        let mut prioritized: Vec<(i32, Move)> = moves
            .iter()
            .map(|mv| (self.priority(mv, state, hints), *mv))
            .collect();
        prioritized.sort_by(|a, b| b.0.cmp(&a.0));

        for (slot, (_, mv)) in moves.iter_mut().zip(prioritized) {
            *slot = mv;
        }
    }

    fn record_cutoff(&self, game_move: &Move, state: &mut GomokuState, depth: u8) {
        state.history_mut().record_cutoff(game_move.pos, depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::player::Player;
    use crate::board::pos::Pos;
    use crate::board::Board;

    fn no_hints() -> [Option<Move>; 2] {
        [None, None]
    }

    #[test]
    fn test_open_four_is_ordered_first() {
        // black has three on row 8; e8 and i8 make open fours
        let board = Board::from_moves("f8 a1 g8 a3 h8 a5").unwrap();
        let mut state = GomokuState::new(board, Player::Black);
        let mut moves = vec![
            Move::new(Pos::new(10, 10), Player::Black),
            Move::new(Pos::new(6, 6), Player::Black),
            Move::new(Pos::new(7, 8), Player::Black),
        ];
        let killers = no_hints();
        let hints = OrderingHints {
            pv_move: None,
            killers: &killers,
            ply: 0,
        };

        GomokuMoveOrderer.order_moves(&mut moves, &mut state, &hints);

        assert_eq!(moves[0].pos, Pos::new(7, 8));
    }

    #[test]
    fn test_pv_move_beats_shape() {
        let board = Board::from_moves("f8 a1 g8 a3 h8 a5").unwrap();
        let mut state = GomokuState::new(board, Player::Black);
        let pv = Move::new(Pos::new(10, 10), Player::Black);
        let mut moves = vec![Move::new(Pos::new(7, 8), Player::Black), pv];
        let killers = no_hints();
        let hints = OrderingHints {
            pv_move: Some(&pv),
            killers: &killers,
            ply: 0,
        };

        GomokuMoveOrderer.order_moves(&mut moves, &mut state, &hints);

        assert_eq!(moves[0], pv);
    }

    #[test]
    fn test_killer_and_history_raise_priority() {
        let board = Board::from_moves("h8").unwrap();
        let mut state = GomokuState::new(board, Player::White);
        // two cells of equal value, mirror images around the stone
        let left = Move::new(Pos::new(7, 6), Player::White);
        let right = Move::new(Pos::new(7, 8), Player::White);
        let killers = [Some(right), None];
        let hints = OrderingHints {
            pv_move: None,
            killers: &killers,
            ply: 1,
        };
        let mut moves = vec![left, right];
        GomokuMoveOrderer.order_moves(&mut moves, &mut state, &hints);
        assert_eq!(moves[0], right);

        let empty = no_hints();
        let hints = OrderingHints {
            pv_move: None,
            killers: &empty,
            ply: 1,
        };
        GomokuMoveOrderer.record_cutoff(&left, &mut state, 3);
        let mut moves = vec![right, left];
        GomokuMoveOrderer.order_moves(&mut moves, &mut state, &hints);
        assert_eq!(moves[0], left);
    }

    #[test]
    fn test_tactical_bonus() {
        let mut counts = PatternCounts::default();
        assert_eq!(tactical_bonus(&counts), 0);
        counts.open_three = 1;
        assert_eq!(tactical_bonus(&counts), OPEN_THREE_BONUS);
        counts.closed_four = 1;
        assert_eq!(tactical_bonus(&counts), CLOSED_FOUR_BONUS);
        counts.open_four = 1;
        assert_eq!(tactical_bonus(&counts), OPEN_FOUR_BONUS);
    }
}
