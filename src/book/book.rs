//! Rule-based opening replies for the engine's first moves.

use std::fmt::{Display, Formatter};

use crate::board::player::Player;
use crate::board::pos::{Pos, CENTER};
use crate::board::Board;

/// The engine consults the book for this many of its own moves.
pub const BOOK_MOVES: usize = 2;

const CENTER_DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Which opening rule produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookLine {
    /// Empty board: take the center.
    Center,
    /// The opponent took the center: answer on a diagonal next to it.
    CenterDiagonal,
    /// The opponent opened off-center: answer next to it on the side of the center.
    TowardCenter,
    /// Two opposing stones one cell apart: take the cell between them.
    SplitBlock,
    /// Two adjacent opposing stones: cap the end closer to the center.
    EndBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookMove {
    pub pos: Pos,
    pub line: BookLine,
}

impl BookMove {
    fn new(pos: Pos, line: BookLine) -> Self {
        Self { pos, line }
    }
}

#[derive(Debug, Clone)]
pub struct Book {
    max_moves: usize,
}

impl Default for Book {
    fn default() -> Self {
        Self {
            max_moves: BOOK_MOVES,
        }
    }
}

impl Book {
    pub fn new() -> Self {
        Default::default()
    }

    /// Book reply for `player` to move on `board`, if the position is still in
    /// the opening and one of the rules applies.
    pub fn lookup(&self, board: &Board, player: Player) -> Option<BookMove> {
        if board.stones(player).count() >= self.max_moves {
            return None;
        }

        let opponent: Vec<Pos> = board.stones(player.opposite()).collect();
        match (board.stone_count(), opponent.as_slice()) {
            (0, _) => Some(BookMove::new(CENTER, BookLine::Center)),
            (1, &[stone]) => Some(Self::answer_single(stone)),
            (_, &[first, second]) => Self::block_pair(board, first, second),
            _ => None,
        }
    }

    fn answer_single(stone: Pos) -> BookMove {
        if stone == CENTER {
            let (dr, dc) = CENTER_DIAGONALS[fastrand::usize(..CENTER_DIAGONALS.len())];
            // the center's neighbours are always on the board
            let pos = CENTER.offset(dr, dc).unwrap_or(CENTER);
            return BookMove::new(pos, BookLine::CenterDiagonal);
        }

        let dr = (CENTER.row as i32 - stone.row as i32).signum();
        let dc = (CENTER.col as i32 - stone.col as i32).signum();
        let pos = stone.offset(dr, dc).unwrap_or(CENTER);
        BookMove::new(pos, BookLine::TowardCenter)
    }

    fn block_pair(board: &Board, first: Pos, second: Pos) -> Option<BookMove> {
        let dr = second.row as i32 - first.row as i32;
        let dc = second.col as i32 - first.col as i32;
        if dr != 0 && dc != 0 && dr.abs() != dc.abs() {
            return None;
        }
        let (step_r, step_c) = (dr.signum(), dc.signum());

        match first.distance(second) {
            1 => [first.offset(-step_r, -step_c), second.offset(step_r, step_c)]
                .iter()
                .flatten()
                .copied()
                .filter(|&pos| board.is_empty_at(pos))
                .min_by_key(|&pos| pos.distance(CENTER))
                .map(|pos| BookMove::new(pos, BookLine::EndBlock)),
            2 => first
                .offset(step_r, step_c)
                .filter(|&pos| board.is_empty_at(pos))
                .map(|pos| BookMove::new(pos, BookLine::SplitBlock)),
            _ => None,
        }
    }
}

impl Display for BookLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BookLine::Center => "center",
            BookLine::CenterDiagonal => "center diagonal",
            BookLine::TowardCenter => "toward center",
            BookLine::SplitBlock => "split block",
            BookLine::EndBlock => "end block",
        };
        write!(f, "{}", name)
    }
}

impl Display for BookMove {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.pos, self.line)
    }
}
