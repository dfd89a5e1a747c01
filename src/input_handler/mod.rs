//! Parsing of interactive player input.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::board::pos::Pos;

static PLACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-o])(1[0-5]|[1-9])$").expect("PLACE_RE regex should be valid"));

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("io error: {error:?}")]
    IOError { error: String },
    #[error("invalid input: {input:?}")]
    InvalidInput { input: String },
    #[error("input closed")]
    UserExit,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PlayerInput {
    /// Place a stone, written like `h8`.
    Place(Pos),
    Undo,
    /// Ask the engine to suggest a move.
    Hint,
    Quit,
}

impl FromStr for PlayerInput {
    type Err = InputError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim().to_lowercase();

        match trimmed.as_str() {
            "undo" | "u" => return Ok(PlayerInput::Undo),
            "hint" | "?" => return Ok(PlayerInput::Hint),
            "quit" | "q" | "exit" => return Ok(PlayerInput::Quit),
            _ => {}
        }

        PLACE_RE
            .captures(&trimmed)
            .and_then(|caps| Pos::from_algebraic(&caps[0]))
            .map(PlayerInput::Place)
            .ok_or_else(|| InputError::InvalidInput {
                input: input.trim().to_string(),
            })
    }
}

/// Prompts on stdout and reads one line of player input from stdin.
pub fn parse_player_input(prompt: &str) -> Result<PlayerInput, InputError> {
    print!("{}", prompt);
    io::stdout().flush().map_err(|e| InputError::IOError {
        error: format!("Failed to flush stdout: {}", e),
    })?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| InputError::IOError {
            error: format!("Failed to read input: {}", e),
        })?;
    if read == 0 {
        return Err(InputError::UserExit);
    }

    line.parse()
}
