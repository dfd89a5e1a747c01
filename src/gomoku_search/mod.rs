//! Gomoku-specific implementation of the alpha-beta search traits.

mod history_table;
pub mod implementation;
pub mod move_generator;
mod move_orderer;


pub use history_table::HistoryTable;
pub use implementation::{search_best_move, GomokuEvaluator, GomokuState, EVAL_LIMIT};
pub use move_generator::{candidate_cap, GomokuMoveGenerator, GomokuMoveList};
pub use move_orderer::GomokuMoveOrderer;
