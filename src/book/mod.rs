//! Opening book for gomoku positions.

#[allow(clippy::module_inception)]
pub mod book;

pub use book::{Book, BookLine, BookMove, BOOK_MOVES};
