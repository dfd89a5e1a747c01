use super::error::BoardError;
use super::player::Player;
use super::pos::{Move, Pos, BOARD_SIZE};
use super::Board;
use std::fmt;
use std::str::FromStr;

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let last = self.last_move().map(|mv| mv.pos);

        write!(f, "   ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", (b'a' + col as u8) as char)?;
        }
        writeln!(f)?;

        for row in 0..BOARD_SIZE {
            write!(f, "{:>3}", row + 1)?;
            for col in 0..BOARD_SIZE {
                let pos = Pos::new(row as u8, col as u8);
                let marker = if Some(pos) == last { '>' } else { ' ' };
                write!(f, "{}{}", marker, self.get(pos).to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Board {
    /// Compact one-line form: 15 rows of `.XO` joined by `/`.
    pub fn to_position_string(&self) -> String {
        (0..BOARD_SIZE)
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| self.get(Pos::new(row as u8, col as u8)).to_char())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

fn parse_cell(c: char) -> Result<Option<Player>, BoardError> {
    match c {
        '.' | '-' | '_' => Ok(None),
        'X' | 'x' | 'B' | 'b' => Ok(Some(Player::Black)),
        'O' | 'o' | 'W' | 'w' => Ok(Some(Player::White)),
        _ => Err(BoardError::InvalidPosition(format!(
            "unexpected character '{}'",
            c
        ))),
    }
}

/// Parses 15 rows of `.`/`X`/`O` separated by `/` or newlines. Stones are
/// recorded in row-major order.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = input
            .split(|c| c == '/' || c == '\n')
            .map(str::trim)
            .filter(|row| !row.is_empty())
            .collect();

        if rows.len() != BOARD_SIZE {
            return Err(BoardError::InvalidPosition(format!(
                "expected {} rows, got {}",
                BOARD_SIZE,
                rows.len()
            )));
        }

        let mut board = Board::new();
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != BOARD_SIZE {
                return Err(BoardError::InvalidPosition(format!(
                    "row {} has {} cells, expected {}",
                    row + 1,
                    cells.len(),
                    BOARD_SIZE
                )));
            }
            for (col, &c) in cells.iter().enumerate() {
                if let Some(player) = parse_cell(c)? {
                    board.apply_move(Move::new(Pos::new(row as u8, col as u8), player))?;
                }
            }
        }
        Ok(board)
    }
}

/// Builds a board from a literal 15×15 grid of `.`, `X` and `O`, read
/// row by row from the top.
#[macro_export]
macro_rules! gomoku_position {
    ($($cell:tt)*) => {{
        let mut board = $crate::board::Board::new();
        // Convert all input tokens to a string and filter out whitespace characters.
        let cells: Vec<_> = stringify!($($cell)*)
            .chars()
            .filter(|&c| !c.is_whitespace())
            .collect();
        let size = $crate::board::pos::BOARD_SIZE;
        assert_eq!(cells.len(), size * size, "Invalid number of cells. Expected {}, got {}", size * size, cells.len());
        for (i, &c) in cells.iter().enumerate() {
            let player = match c {
                '.' => continue,
                'X' => $crate::board::player::Player::Black,
                'O' => $crate::board::player::Player::White,
                _ => panic!("Invalid character in gomoku position"),
            };
            let pos = $crate::board::pos::Pos::new((i / size) as u8, (i % size) as u8);
            board
                .apply_move($crate::board::pos::Move::new(pos, player))
                .unwrap();
        }
        board
    }};
}
