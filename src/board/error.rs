use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("Position ({row}, {col}) is outside the board")]
    OutOfBounds { row: u8, col: u8 },
    #[error("Cannot place a stone on ({row}, {col}), the cell is already occupied")]
    CellOccupied { row: u8, col: u8 },
    #[error("Cannot remove a stone from ({row}, {col}), the cell is empty")]
    CellEmpty { row: u8, col: u8 },
    #[error("There is no move to undo")]
    NothingToUndo,
    #[error("Invalid position: {0}")]
    InvalidPosition(String),
}
