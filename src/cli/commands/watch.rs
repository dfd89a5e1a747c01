//! Watch command - watch the computer play against itself.

use std::time::Duration;

use gomoku::board::player::Player;
use gomoku::game::difficulty::Difficulty;
use gomoku::game::engine::Engine;
use structopt::StructOpt;

use super::util::{create_config, run_game_loop, starting_position};
use super::Command;

#[derive(StructOpt)]
pub struct WatchArgs {
    #[structopt(short, long, default_value = "medium")]
    pub difficulty: Difficulty,
    #[structopt(long = "moves", help = "Opening moves, e.g. \"h8 h9\"")]
    pub moves: Option<String>,
    #[structopt(
        long = "delay",
        default_value = "1000",
        help = "Delay between moves in milliseconds"
    )]
    pub delay_ms: u64,
}

impl Command for WatchArgs {
    fn execute(self) {
        let board = match starting_position(self.moves.as_deref()) {
            Ok(board) => board,
            Err(error) => {
                eprintln!("Invalid --moves: {}", error);
                std::process::exit(1);
            }
        };

        let config = create_config(self.difficulty, board, Player::Black);
        run_game_loop(
            Engine::with_config(config),
            None,
            Duration::from_millis(self.delay_ms),
        );
    }
}
