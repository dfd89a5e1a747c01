//! CLI argument parsing using StructOpt.

use structopt::StructOpt;

use crate::cli::commands::{
    calculate_best_move::CalculateBestMoveArgs, play::PlayArgs, watch::WatchArgs,
};

#[derive(StructOpt)]
#[structopt(name = "gomoku", about = "A gomoku engine implemented in Rust")]
pub enum Gomoku {
    #[structopt(
        name = "play",
        about = "Play a game against the computer at the given `--difficulty` (easy, medium or hard; default: medium). You play black unless you pick another `--color`. Opening moves can be given with `--moves`, e.g. `--moves \"h8 h9\"`. Type a cell like `h8` to move, `undo` to take back your last move, `hint` for a suggestion and `quit` to leave."
    )]
    Play(PlayArgs),
    #[structopt(
        name = "watch",
        about = "Watch the computer play against itself at the given `--difficulty` (default: medium), pausing `--delay` milliseconds between moves."
    )]
    Watch(WatchArgs),
    #[structopt(
        name = "calculate-best-move",
        about = "Print the engine's move for a position given either as a move list with `--moves` or as 15 rows of `.XO` separated by `/` with `--position`. The side to move is inferred from the stone count unless `--player` is given."
    )]
    CalculateBestMove(CalculateBestMoveArgs),
}

impl crate::cli::commands::Command for Gomoku {
    fn execute(self) {
        macro_rules! execute_command {
            ($($variant:ident($cmd:ident)),+ $(,)?) => {
                match self {
                    $(Self::$variant($cmd) => $cmd.execute(),)+
                }
            };
        }

        execute_command! {
            Play(cmd),
            Watch(cmd),
            CalculateBestMove(cmd),
        }
    }
}
