//! Generic alpha-beta search for two-player zero-sum games.
//!
//! The search only knows about the traits in `traits`; a game plugs in its own state,
//! move type, move generator, evaluator and move orderer.

mod killer_moves;
mod pv_table;
mod search;
mod traits;
mod transposition_table;

#[cfg(test)]
mod tests;

pub use pv_table::PvTable;
pub use search::{
    alpha_beta_search, is_win_score, SearchContext, SearchError, SearchOptions,
    ASPIRATION_WINDOW, QUIESCENCE_DEPTH, TIME_CHECK_INTERVAL, WIN_MARGIN, WIN_PLY_PENALTY,
    WIN_SCORE,
};
pub use traits::{
    Evaluator, GameMove, GameState, MoveCollection, MoveGenerator, MoveOrderer, OrderingHints,
};
pub use transposition_table::{BoundType, TTEntry, TTLookup, TranspositionTable};
