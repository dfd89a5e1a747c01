use std::fmt;

use super::player::Player;

pub const BOARD_SIZE: usize = 15;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE;
pub const CENTER: Pos = Pos { row: 7, col: 7 };

/// The four line axes: horizontal, vertical and the two diagonals.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// All eight neighbouring steps.
pub const NEIGHBOR_STEPS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// An intersection on the 15×15 board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Builds a position from signed coordinates, returning `None` off the board.
    pub fn from_signed(row: i32, col: i32) -> Option<Self> {
        let size = BOARD_SIZE as i32;
        if row < 0 || row >= size || col < 0 || col >= size {
            return None;
        }
        Some(Self::new(row as u8, col as u8))
    }

    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn offset(&self, d_row: i32, d_col: i32) -> Option<Self> {
        Self::from_signed(self.row as i32 + d_row, self.col as i32 + d_col)
    }

    /// Chebyshev distance to another position.
    pub fn distance(&self, other: Pos) -> u8 {
        let d_row = (self.row as i32 - other.row as i32).abs();
        let d_col = (self.col as i32 - other.col as i32).abs();
        d_row.max(d_col) as u8
    }

    /// Every position in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..BOARD_SIZE as u8).flat_map(|row| (0..BOARD_SIZE as u8).map(move |col| Pos::new(row, col)))
    }

    /// Parses coordinates like `h8`: column letter `a`-`o`, row number `1`-`15` from the top.
    pub fn from_algebraic(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        let col_char = chars.next()?.to_ascii_lowercase();
        if !('a'..='o').contains(&col_char) {
            return None;
        }
        let row_number: usize = chars.as_str().parse().ok()?;
        if row_number == 0 || row_number > BOARD_SIZE {
            return None;
        }
        Some(Self::new((row_number - 1) as u8, col_char as u8 - b'a'))
    }

    pub fn to_algebraic(&self) -> String {
        format!("{}{}", (b'a' + self.col) as char, self.row as usize + 1)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// A stone placement: who played where.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    pub pos: Pos,
    pub player: Player,
}

impl Move {
    pub const fn new(pos: Pos, player: Player) -> Self {
        Self { pos, player }
    }

    pub fn row(&self) -> u8 {
        self.pos.row
    }

    pub fn col(&self) -> u8 {
        self.pos.col
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.player, self.pos)
    }
}
