//! Gomoku-specific trait implementations for the alpha-beta search.

use crate::alpha_beta_searcher::{
    alpha_beta_search, Evaluator, GameMove, GameState, SearchContext, SearchError,
};
use crate::board::error::BoardError;
use crate::board::player::Player;
use crate::board::pos::Move;
use crate::board::Board;
use crate::evaluate::PositionEvaluator;
use crate::threat::ThreatDetector;

use super::history_table::HistoryTable;
use super::move_generator::GomokuMoveGenerator;
use super::move_orderer::GomokuMoveOrderer;

/// Static evaluations are kept inside this bound so they never look like a
/// forced win to the search.
pub const EVAL_LIMIT: i32 = 90_000;

/// Everything the search mutates: the board, whose turn it is, which side the
/// engine plays (the maximizing side) and the per-turn caches.
pub struct GomokuState {
    board: Board,
    turn: Player,
    ai_player: Player,
    evaluator: PositionEvaluator,
    history: HistoryTable,
}

impl GomokuState {
    pub fn new(board: Board, turn: Player) -> Self {
        Self {
            board,
            turn,
            ai_player: turn,
            evaluator: PositionEvaluator::new(),
            history: HistoryTable::new(),
        }
    }

    /// Loads a new position for `turn` to move and play as, keeping the caches.
    pub fn set_position(&mut self, board: Board, turn: Player) {
        self.board = board;
        self.turn = turn;
        self.ai_player = turn;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn ai_player(&self) -> Player {
        self.ai_player
    }

    pub fn history(&self) -> &HistoryTable {
        &self.history
    }

    pub(super) fn history_mut(&mut self) -> &mut HistoryTable {
        &mut self.history
    }

    /// Board and evaluator borrowed together, for code that reads one while
    /// filling the other's caches.
    pub fn board_and_evaluator(&mut self) -> (&Board, &mut PositionEvaluator) {
        (&self.board, &mut self.evaluator)
    }

    /// Tactical scans over the current board.
    pub fn threats(&mut self) -> ThreatDetector<'_> {
        ThreatDetector::new(&mut self.board, self.evaluator.classifier())
    }

    /// Score of the position from the engine's point of view.
    pub fn evaluate(&mut self) -> i32 {
        self.evaluator
            .evaluate_board(&self.board, self.ai_player)
            .clamp(-EVAL_LIMIT, EVAL_LIMIT)
    }

    /// Drops the per-position caches and the history weights. The pattern
    /// cache does not depend on the position and is kept.
    pub fn clear_turn_caches(&mut self) {
        self.evaluator.clear();
        self.history.clear();
    }
}

impl GameState for GomokuState {
    #[inline]
    fn position_hash(&self) -> u64 {
        self.board.hash()
    }

    #[inline]
    fn is_maximizing_player(&self) -> bool {
        self.turn == self.ai_player
    }

    #[inline]
    fn toggle_turn(&mut self) {
        self.turn = self.turn.opposite();
    }
}

impl GameMove for Move {
    type State = GomokuState;
    type Error = BoardError;

    #[inline]
    fn apply(&self, state: &mut GomokuState) -> Result<(), BoardError> {
        state.board.place(self.pos, self.player)
    }

    #[inline]
    fn undo(&self, state: &mut GomokuState) -> Result<(), BoardError> {
        state.board.remove(self.pos).map(|_| ())
    }

    /// Placements that make at least an open three.
    #[inline]
    fn is_tactical(&self, state: &mut GomokuState) -> bool {
        state
            .evaluator
            .classifier()
            .counts_at(&state.board, self.pos, self.player)
            .has_forcing_threat()
    }

    #[inline]
    fn is_winning(&self, state: &mut GomokuState) -> bool {
        state.board.check_win(self.pos)
    }
}

#[derive(Clone, Copy, Default, Debug)]
pub struct GomokuEvaluator;

impl Evaluator<GomokuState> for GomokuEvaluator {
    #[inline]
    fn evaluate(&self, state: &mut GomokuState) -> i32 {
        state.evaluate()
    }
}

/// Searches for the best move for the side to move in `state`.
#[must_use = "search returns the best move found"]
pub fn search_best_move(
    context: &mut SearchContext<Move>,
    state: &mut GomokuState,
) -> Result<Move, SearchError> {
    // Clear history at start of each search to prevent stale weights dominating
    state.history.clear();

    let move_generator = GomokuMoveGenerator::default();
    let evaluator = GomokuEvaluator;
    let move_orderer = GomokuMoveOrderer;

    alpha_beta_search(context, state, &move_generator, &evaluator, &move_orderer)
}
