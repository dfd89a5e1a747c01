//! Play command - play a game against the computer.

use std::time::Duration;

use gomoku::board::player::Player;
use gomoku::game::difficulty::Difficulty;
use gomoku::game::engine::Engine;
use structopt::StructOpt;

use super::util::{create_config, run_game_loop, starting_position};
use super::Command;

#[derive(StructOpt)]
pub struct PlayArgs {
    #[structopt(short, long, default_value = "medium")]
    pub difficulty: Difficulty,
    #[structopt(short = "c", long = "color", default_value = "black")]
    pub color: Player,
    #[structopt(long = "moves", help = "Opening moves, e.g. \"h8 h9\"")]
    pub moves: Option<String>,
}

impl Command for PlayArgs {
    fn execute(self) {
        let board = match starting_position(self.moves.as_deref()) {
            Ok(board) => board,
            Err(error) => {
                eprintln!("Invalid --moves: {}", error);
                std::process::exit(1);
            }
        };

        let config = create_config(self.difficulty, board, self.color);
        run_game_loop(Engine::with_config(config), Some(self.color), Duration::ZERO);
    }
}
