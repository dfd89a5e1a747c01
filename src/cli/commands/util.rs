//! Shared utilities for CLI commands.

use std::time::Duration;

use gomoku::board::error::BoardError;
use gomoku::board::player::Player;
use gomoku::board::Board;
use gomoku::game::difficulty::Difficulty;
use gomoku::game::engine::{Engine, EngineConfig, EngineError, GameEnding};
use gomoku::input_handler::{parse_player_input, InputError, PlayerInput};

pub(crate) fn create_config(
    difficulty: Difficulty,
    starting_position: Board,
    human_player: Player,
) -> EngineConfig {
    EngineConfig {
        difficulty,
        starting_position,
        human_player,
    }
}

/// Board from an optional move list like `"h8 h9 i9"`.
pub(crate) fn starting_position(moves: Option<&str>) -> Result<Board, BoardError> {
    match moves {
        Some(moves) => Board::from_moves(moves),
        None => Ok(Board::new()),
    }
}

fn announce(ending: GameEnding) {
    match ending {
        GameEnding::Win { player, line } => {
            let cells: Vec<String> = line.iter().map(|pos| pos.to_string()).collect();
            println!("{} wins with {}!", player, cells.join(" "));
        }
        GameEnding::Draw => println!("Draw!"),
    }
}

/// Plays until the game ends. The engine moves for every side except
/// `human`; with no human it plays itself, pausing `delay` between moves.
pub(crate) fn run_game_loop(mut engine: Engine, human: Option<Player>, delay: Duration) {
    loop {
        println!("{}", engine.board());

        if let Some(ending) = engine.check_game_over() {
            announce(ending);
            break;
        }

        let turn = engine.turn();
        if Some(turn) == human {
            match parse_player_input(&format!("{} to move> ", turn)) {
                Ok(PlayerInput::Place(pos)) => {
                    if let Err(error) = engine.make_move(pos) {
                        println!("error: {}", error);
                    }
                }
                Ok(PlayerInput::Undo) => match engine.undo() {
                    Ok(undone) => {
                        let moves: Vec<String> = undone.iter().map(|mv| mv.to_string()).collect();
                        println!("took back {}", moves.join(", "));
                    }
                    Err(error) => println!("error: {}", error),
                },
                Ok(PlayerInput::Hint) => match engine.get_best_move() {
                    Ok(hint) => println!("hint: {}", hint.pos),
                    Err(error) => println!("error: {}", error),
                },
                Ok(PlayerInput::Quit) | Err(InputError::UserExit) => break,
                Err(error) => println!("{}", error),
            }
            continue;
        }

        println!("{} is thinking...", turn);
        match engine.make_best_move() {
            Ok(best_move) => {
                let stats = engine.get_search_stats();
                match stats.source {
                    Some(source) => println!("{} ({})", best_move, source),
                    None => println!("{}", best_move),
                }
            }
            Err(EngineError::NoMoveFound) => {
                announce(GameEnding::Draw);
                break;
            }
            Err(error) => {
                println!("error: {}", error);
                break;
            }
        }

        if human.is_none() {
            std::thread::sleep(delay);
        }
    }
}
