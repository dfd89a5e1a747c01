//! Common types re-exported for convenience.

pub use crate::board::player::{Cell, Player};
pub use crate::board::pos::{Move, Pos, BOARD_SIZE, CENTER};
pub use crate::board::Board;
pub use crate::game::{compute_move, Difficulty, Engine, EngineConfig, GameEnding};
