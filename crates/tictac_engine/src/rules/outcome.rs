//! Combines the line scans and the tie scan into one verdict.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::draw::is_full;
use super::win::{Line, find_winning_line, scan_anti_diagonal, scan_columns, scan_main_diagonal, scan_rows};
use crate::types::Board;

/// Result of inspecting a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// No complete line and at least one empty cell.
    Ongoing,
    /// A line is complete.
    Win(Line),
    /// Every cell is filled and no line is complete.
    Tie,
}

impl Outcome {
    /// The completed line, if any.
    pub fn line(&self) -> Option<Line> {
        match self {
            Outcome::Win(line) => Some(*line),
            Outcome::Ongoing | Outcome::Tie => None,
        }
    }
}

/// Inspects the board, scanning one line family at a time.
#[instrument(skip(board), fields(size = board.size()))]
pub fn detect_outcome(board: &Board) -> Outcome {
    if let Some(line) = find_winning_line(board) {
        return Outcome::Win(line);
    }
    if is_full(board) {
        return Outcome::Tie;
    }
    Outcome::Ongoing
}

/// Inspects the board with the four line scans joined concurrently.
///
/// The tie scan runs only once every line scan has reported no win.
#[instrument(skip(board), fields(size = board.size()))]
pub async fn detect_outcome_concurrent(board: &Board) -> Outcome {
    let (main, anti, rows, columns) = tokio::join!(
        async { scan_main_diagonal(board) },
        async { scan_anti_diagonal(board) },
        async { scan_rows(board) },
        async { scan_columns(board) },
    );
    debug!(?main, ?anti, ?rows, ?columns, "Line scans joined");

    if let Some(line) = main.or(anti).or(rows).or(columns) {
        return Outcome::Win(line);
    }
    if is_full(board) {
        return Outcome::Tie;
    }
    Outcome::Ongoing
}
