use rand::seq::SliceRandom;
use std::fmt;
use std::str::FromStr;

/// One of the two sides. Black moves first.
#[derive(Clone, Copy, PartialEq, Debug, Eq, PartialOrd, Ord, Hash)]
pub enum Player {
    Black = 0,
    White = 1,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Black, Player::White];

    pub fn opposite(&self) -> Self {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn random() -> Self {
        *Self::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&Player::Black)
    }

    pub fn to_char(&self) -> char {
        match self {
            Player::Black => 'X',
            Player::White => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let player_str = match self {
            Player::Black => "black",
            Player::White => "white",
        };
        write!(f, "{}", player_str)
    }
}

// used for parsing cli args
type ParseError = &'static str;
impl FromStr for Player {
    type Err = ParseError;
    fn from_str(player: &str) -> Result<Self, Self::Err> {
        match player {
            "black" => Ok(Player::Black),
            "white" => Ok(Player::White),
            "random" => Ok(Player::random()),
            _ => Err("invalid color; options are: black, white, random"),
        }
    }
}

/// Contents of a single intersection.
#[derive(Clone, Copy, PartialEq, Debug, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

impl Cell {
    pub fn player(&self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn to_char(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Black => Player::Black.to_char(),
            Cell::White => Player::White.to_char(),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}
