pub mod controller;
pub mod difficulty;
pub mod engine;

pub use controller::{compute_move, Decision, MoveController, MoveSource};
pub use difficulty::{adaptive_depth, Difficulty, DifficultyProfile, VcfDefense};
pub use engine::{Engine, EngineConfig, EngineError, GameEnding, SearchStats};
