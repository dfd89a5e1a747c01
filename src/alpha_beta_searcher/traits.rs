//! Core traits for generic alpha-beta search.

use std::fmt::Debug;

/// Represents the state of a two-player zero-sum game.
pub trait GameState {
    /// Returns a hash of the current position for transposition table lookups.
    fn position_hash(&self) -> u64;

    /// Returns true if the current player is the maximizing player.
    fn is_maximizing_player(&self) -> bool;

    /// Switches to the next player's turn.
    fn toggle_turn(&mut self);
}

/// Represents an action that can be applied to and undone from a game state.
pub trait GameMove: Clone + PartialEq + Debug {
    type State: GameState;
    type Error: Debug;

    /// Applies this move to the given state.
    fn apply(&self, state: &mut Self::State) -> Result<(), Self::Error>;

    /// Undoes this move on the given state.
    fn undo(&self, state: &mut Self::State) -> Result<(), Self::Error>;

    /// Returns true if this move is "tactical" and should be searched in quiescence.
    /// Called before the move is applied. Default implementation returns false.
    fn is_tactical(&self, _state: &mut Self::State) -> bool {
        false
    }

    /// Returns true if this move, already applied to `state`, ended the game in
    /// favour of the player who made it. Default implementation returns false.
    fn is_winning(&self, _state: &mut Self::State) -> bool {
        false
    }
}

/// Generates all legal moves from a given game state.
pub trait MoveGenerator<S: GameState> {
    type Move: GameMove<State = S>;
    type MoveList: MoveCollection<Self::Move>;

    /// Generates all legal moves for the current player.
    fn generate_moves(&self, state: &mut S) -> Self::MoveList;
}

/// Evaluates a game position and returns a score.
pub trait Evaluator<S: GameState> {
    /// Evaluates the given state. Higher scores favor the maximizing player.
    fn evaluate(&self, state: &mut S) -> i32;
}

/// Ordering hints the search hands to a `MoveOrderer` at each node.
pub struct OrderingHints<'a, M> {
    /// Best move recorded for this position by a previous iteration.
    pub pv_move: Option<&'a M>,
    /// Moves that caused cutoffs at the same ply.
    pub killers: &'a [Option<M>; 2],
    /// Distance from the root.
    pub ply: u8,
}

/// Orders moves to improve alpha-beta pruning efficiency.
pub trait MoveOrderer<S: GameState, M> {
    /// Sorts moves in-place, placing "better" moves first.
    fn order_moves(&self, moves: &mut [M], state: &mut S, hints: &OrderingHints<M>);

    /// Called when `game_move` caused a cutoff `depth` plies from the horizon.
    fn record_cutoff(&self, _game_move: &M, _state: &mut S, _depth: u8) {}
}

/// Abstraction over move collections (Vec, SmallVec, etc.)
pub trait MoveCollection<M>: AsRef<[M]> + AsMut<[M]> {
    #[inline]
    fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }

    #[inline]
    fn len(&self) -> usize {
        self.as_ref().len()
    }
}

impl<M> MoveCollection<M> for Vec<M> {}
