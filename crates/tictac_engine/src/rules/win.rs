//! Win detection for N×N boards.
//!
//! A line is won only when every one of its N cells holds the same
//! symbol. Each scan reads the board and nothing else, so the four scans
//! can run side by side over one snapshot.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::types::{Board, Cell};

/// A completed line on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    /// Row with the given index.
    Row(usize),
    /// Column with the given index.
    Column(usize),
    /// Cells `(i, i)`.
    MainDiagonal,
    /// Cells `(i, size - 1 - i)`.
    AntiDiagonal,
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Row(i) => write!(f, "row {}", i),
            Line::Column(i) => write!(f, "column {}", i),
            Line::MainDiagonal => write!(f, "main diagonal"),
            Line::AntiDiagonal => write!(f, "anti-diagonal"),
        }
    }
}

/// True when all cells are occupied by one symbol. Empty input is never won.
fn is_complete(mut cells: impl Iterator<Item = Cell>) -> bool {
    let Some(first) = cells.next() else {
        return false;
    };
    if first.is_empty() {
        return false;
    }
    cells.all(|cell| cell == first)
}

/// Scans the main diagonal.
#[instrument(skip(board), fields(size = board.size()))]
pub fn scan_main_diagonal(board: &Board) -> Option<Line> {
    let size = board.size();
    is_complete((0..size).map(|i| board.at(i, i))).then_some(Line::MainDiagonal)
}

/// Scans the anti-diagonal.
#[instrument(skip(board), fields(size = board.size()))]
pub fn scan_anti_diagonal(board: &Board) -> Option<Line> {
    let size = board.size();
    is_complete((0..size).map(|i| board.at(i, size - 1 - i))).then_some(Line::AntiDiagonal)
}

/// Scans rows top to bottom, stopping at the first complete one.
#[instrument(skip(board), fields(size = board.size()))]
pub fn scan_rows(board: &Board) -> Option<Line> {
    let size = board.size();
    (0..size)
        .find(|&row| is_complete((0..size).map(|column| board.at(row, column))))
        .map(Line::Row)
}

/// Scans columns left to right, stopping at the first complete one.
#[instrument(skip(board), fields(size = board.size()))]
pub fn scan_columns(board: &Board) -> Option<Line> {
    let size = board.size();
    (0..size)
        .find(|&column| is_complete((0..size).map(|row| board.at(row, column))))
        .map(Line::Column)
}

/// Returns the first complete line found, if any.
#[instrument(skip(board), fields(size = board.size()))]
pub fn find_winning_line(board: &Board) -> Option<Line> {
    scan_main_diagonal(board)
        .or_else(|| scan_anti_diagonal(board))
        .or_else(|| scan_rows(board))
        .or_else(|| scan_columns(board))
}
