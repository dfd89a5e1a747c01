pub mod error;
pub mod player;
pub mod pos;
pub mod zobrist;

mod display;


use error::BoardError;
use player::{Cell, Player};
use pos::{Move, Pos, BOARD_SIZE, DIRECTIONS, TOTAL_CELLS};
use zobrist::ZOBRIST;

/// Represents the state of a gomoku board: the 15×15 grid, the stack of applied
/// moves and the incrementally maintained zobrist hash of all stones.
///
/// `place`/`remove` are the raw speculative primitives used by search and must be
/// used in strict pairs. `apply_move`/`undo_move` additionally record the move in
/// the game history.
#[derive(Clone)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    history: Vec<Move>,
    hash: u64,
    stone_count: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
            history: Vec::new(),
            hash: 0,
            stone_count: 0,
        }
    }
}

impl Board {
    pub fn new() -> Self {
        Default::default()
    }

    /// Replays a space or comma separated list of coordinates (`h8 h9 i9`),
    /// alternating players starting with black.
    pub fn from_moves(moves: &str) -> Result<Self, BoardError> {
        let mut board = Self::new();
        let mut player = Player::Black;
        for token in moves
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let pos = Pos::from_algebraic(token)
                .ok_or_else(|| BoardError::InvalidPosition(token.to_string()))?;
            board.apply_move(Move::new(pos, player))?;
            player = player.opposite();
        }
        Ok(board)
    }

    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[pos.row as usize][pos.col as usize]
    }

    #[inline]
    pub fn is_empty_at(&self, pos: Pos) -> bool {
        self.get(pos).is_empty()
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn stone_count(&self) -> usize {
        self.stone_count
    }

    pub fn is_empty(&self) -> bool {
        self.stone_count == 0
    }

    pub fn is_full(&self) -> bool {
        self.stone_count == TOTAL_CELLS
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Move> {
        self.history.last().copied()
    }

    /// The player expected to move next, assuming black opened and turns alternated.
    pub fn next_player(&self) -> Player {
        if self.stone_count % 2 == 0 {
            Player::Black
        } else {
            Player::White
        }
    }

    /// Iterates over every stone of `player` in row-major order.
    pub fn stones(&self, player: Player) -> impl Iterator<Item = Pos> + '_ {
        let cell = Cell::from(player);
        Pos::all().filter(move |&pos| self.get(pos) == cell)
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(move |&pos| self.is_empty_at(pos))
    }

    /// Puts a stone on an empty cell and folds its key into the hash.
    pub fn place(&mut self, pos: Pos, player: Player) -> Result<(), BoardError> {
        if !pos.is_valid() {
            return Err(BoardError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            });
        }
        if !self.is_empty_at(pos) {
            return Err(BoardError::CellOccupied {
                row: pos.row,
                col: pos.col,
            });
        }

        self.cells[pos.row as usize][pos.col as usize] = Cell::from(player);
        self.hash ^= ZOBRIST.key(pos, player);
        self.stone_count += 1;
        Ok(())
    }

    /// Lifts a stone off the board, re-applying its key so the hash returns to
    /// its value before the matching `place`.
    pub fn remove(&mut self, pos: Pos) -> Result<Player, BoardError> {
        if !pos.is_valid() {
            return Err(BoardError::OutOfBounds {
                row: pos.row,
                col: pos.col,
            });
        }
        let player = self.get(pos).player().ok_or(BoardError::CellEmpty {
            row: pos.row,
            col: pos.col,
        })?;

        self.cells[pos.row as usize][pos.col as usize] = Cell::Empty;
        self.hash ^= ZOBRIST.key(pos, player);
        self.stone_count -= 1;
        Ok(player)
    }

    /// Runs `f` with a trial stone on `pos` and takes it back afterwards, on every
    /// exit path of `f`. Placing on an occupied cell is a caller bug.
    pub fn with_stone<T, F>(&mut self, pos: Pos, player: Player, f: F) -> T
    where
        F: FnOnce(&mut Board) -> T,
    {
        let placed = self.place(pos, player);
        debug_assert!(placed.is_ok(), "trial stone on {}: {:?}", pos, placed);

        let result = f(self);

        if placed.is_ok() {
            let removed = self.remove(pos);
            debug_assert!(removed.is_ok(), "trial stone vanished from {}", pos);
        }
        result
    }

    /// Places a stone and records it in the game history.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), BoardError> {
        self.place(mv.pos, mv.player)?;
        self.history.push(mv);
        Ok(())
    }

    /// Reverts the most recent recorded move.
    pub fn undo_move(&mut self) -> Result<Move, BoardError> {
        let mv = self.history.pop().ok_or(BoardError::NothingToUndo)?;
        self.remove(mv.pos)?;
        Ok(mv)
    }

    /// Clears the board and history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of contiguous stones of `player` walking from `pos` (exclusive) by `(dr, dc)`.
    fn run_length(&self, pos: Pos, dr: i32, dc: i32, player: Player) -> usize {
        let cell = Cell::from(player);
        let mut count = 0;
        let mut current = pos.offset(dr, dc);
        while let Some(p) = current {
            if self.get(p) != cell {
                break;
            }
            count += 1;
            current = p.offset(dr, dc);
        }
        count
    }

    /// True iff the stone on `pos` is part of five or more in a row.
    pub fn check_win(&self, pos: Pos) -> bool {
        let player = match self.get(pos).player() {
            Some(player) => player,
            None => return false,
        };

        DIRECTIONS.iter().any(|&(dr, dc)| {
            1 + self.run_length(pos, dr, dc, player) + self.run_length(pos, -dr, -dc, player) >= 5
        })
    }

    /// Like `check_win`, but returns the five winning cells (a window of the run
    /// containing `pos`). Only the real game needs this bookkeeping.
    pub fn winning_line(&self, pos: Pos) -> Option<[Pos; 5]> {
        let player = self.get(pos).player()?;

        for &(dr, dc) in DIRECTIONS.iter() {
            let back = self.run_length(pos, -dr, -dc, player);
            let forward = self.run_length(pos, dr, dc, player);
            let len = 1 + back + forward;
            if len < 5 {
                continue;
            }

            let start = back.saturating_sub(4).min(len - 5);
            let first = pos.offset(-dr * (back - start) as i32, -dc * (back - start) as i32)?;
            let mut line = [first; 5];
            for (i, cell) in line.iter_mut().enumerate() {
                *cell = first.offset(dr * i as i32, dc * i as i32)?;
            }
            return Some(line);
        }
        None
    }

    /// True iff any stone lies within Chebyshev `distance` of `pos`.
    pub fn has_neighbor(&self, pos: Pos, distance: u8) -> bool {
        let d = distance as i32;
        for dr in -d..=d {
            for dc in -d..=d {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if let Some(p) = pos.offset(dr, dc) {
                    if !self.is_empty_at(p) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Empty cells within `distance` of a stone, in row-major order.
    pub fn neighborhood(&self, distance: u8) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(move |&pos| self.is_empty_at(pos) && self.has_neighbor(pos, distance))
    }
}
