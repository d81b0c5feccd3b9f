//! Tie detection.

use crate::types::Board;
use tracing::instrument;

/// Checks if every cell is occupied.
///
/// A full board with no winning line is a tie.
#[instrument(skip(board), fields(size = board.size()))]
pub fn is_full(board: &Board) -> bool {
    board.rows().iter().flatten().all(|cell| !cell.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, Symbol};

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new(3)));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new(2);
        board.place(Position::new(0, 0), Symbol::X);
        board.place(Position::new(0, 1), Symbol::O);
        board.place(Position::new(1, 0), Symbol::X);
        assert!(!is_full(&board));
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new(2);
        for (i, pos) in board.empty_positions().into_iter().enumerate() {
            let symbol = if i % 2 == 0 { Symbol::X } else { Symbol::O };
            board.place(pos, symbol);
        }
        assert!(is_full(&board));
    }
}
