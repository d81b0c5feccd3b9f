//! Move legality checks.

use derive_more::{Display, Error};
use tracing::{debug, instrument, warn};

use crate::game::{Move, MoveRequest, PlayerId};
use crate::types::{Board, Position, Symbol};

/// How severe a rejected move is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RejectionKind {
    /// Off the board or onto an occupied cell; the caller may retry.
    Invalid,
    /// Out of turn or reusing the previous symbol.
    TurnViolation,
}

/// Reason a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// Target cell lies outside the board.
    #[display("Position {} is outside a {}x{} board", position, size, size)]
    OutOfBounds {
        /// Requested cell.
        position: Position,
        /// Board side length.
        size: usize,
    },

    /// Target cell already holds a symbol.
    #[display("Cell {} is already occupied", position)]
    CellOccupied {
        /// Requested cell.
        position: Position,
    },

    /// The same player made the previous move.
    #[display("Player {} already played its turn", player)]
    AlreadyPlayed {
        /// The acting player.
        player: PlayerId,
    },

    /// The previous move used the same symbol.
    #[display("Player is not allowed to use symbol {}", symbol)]
    SymbolReused {
        /// The repeated symbol.
        symbol: Symbol,
    },
}

impl MoveError {
    /// Classifies the rejection.
    pub fn kind(&self) -> RejectionKind {
        match self {
            MoveError::OutOfBounds { .. } | MoveError::CellOccupied { .. } => {
                RejectionKind::Invalid
            }
            MoveError::AlreadyPlayed { .. } | MoveError::SymbolReused { .. } => {
                RejectionKind::TurnViolation
            }
        }
    }

    /// True for out-of-turn and repeated-symbol rejections.
    pub fn is_turn_violation(&self) -> bool {
        self.kind() == RejectionKind::TurnViolation
    }
}

/// Checks a candidate move against the board and the previous move.
///
/// Board checks run first, so an occupied cell is reported as
/// [`RejectionKind::Invalid`] even when the move is also out of turn.
///
/// # Errors
///
/// Returns the first [`MoveError`] found.
#[instrument(skip(board, previous), fields(size = board.size(), has_previous = previous.is_some()))]
pub fn validate_move(
    board: &Board,
    candidate: &MoveRequest,
    previous: Option<&Move>,
) -> Result<(), MoveError> {
    let position = candidate.position;

    if !board.contains(position) {
        warn!(%position, "Move outside the board");
        return Err(MoveError::OutOfBounds {
            position,
            size: board.size(),
        });
    }

    if !board.is_empty(position) {
        warn!(%position, "Move onto occupied cell");
        return Err(MoveError::CellOccupied { position });
    }

    let Some(previous) = previous else {
        debug!("First move of the game");
        return Ok(());
    };

    if *previous.player() == candidate.player {
        warn!(player = %candidate.player, "Player moved twice in a row");
        return Err(MoveError::AlreadyPlayed {
            player: candidate.player,
        });
    }

    if *previous.symbol() == candidate.symbol {
        warn!(symbol = %candidate.symbol, "Symbol repeated");
        return Err(MoveError::SymbolReused {
            symbol: candidate.symbol,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameId;

    fn request(player: u64, symbol: Symbol, row: usize, column: usize) -> MoveRequest {
        MoveRequest::new(PlayerId::from(player), symbol, Position::new(row, column))
    }

    fn committed(player: u64, symbol: Symbol, row: usize, column: usize) -> Move {
        Move::new(GameId::from(1), request(player, symbol, row, column))
    }

    #[test]
    fn test_first_move_accepted() {
        let board = Board::new(3);
        assert_eq!(validate_move(&board, &request(1, Symbol::O, 2, 2), None), Ok(()));
    }

    #[test]
    fn test_out_of_bounds_is_invalid() {
        let board = Board::new(3);
        let err = validate_move(&board, &request(1, Symbol::X, 3, 0), None).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::Invalid);
        let err = validate_move(&board, &request(1, Symbol::X, 0, 3), None).unwrap_err();
        assert!(matches!(err, MoveError::OutOfBounds { size: 3, .. }));
    }

    #[test]
    fn test_occupied_cell_is_invalid() {
        let mut board = Board::new(3);
        board.place(Position::new(1, 1), Symbol::X);
        let previous = committed(1, Symbol::X, 1, 1);
        let err = validate_move(&board, &request(2, Symbol::O, 1, 1), Some(&previous)).unwrap_err();
        assert_eq!(err, MoveError::CellOccupied { position: Position::new(1, 1) });
        assert!(!err.is_turn_violation());
    }

    #[test]
    fn test_same_player_twice_is_turn_violation() {
        let mut board = Board::new(3);
        board.place(Position::new(0, 0), Symbol::X);
        let previous = committed(1, Symbol::X, 0, 0);
        let err = validate_move(&board, &request(1, Symbol::O, 1, 1), Some(&previous)).unwrap_err();
        assert!(matches!(err, MoveError::AlreadyPlayed { .. }));
        assert!(err.is_turn_violation());
    }

    #[test]
    fn test_same_symbol_twice_is_turn_violation() {
        let mut board = Board::new(3);
        board.place(Position::new(0, 0), Symbol::X);
        let previous = committed(1, Symbol::X, 0, 0);
        let err = validate_move(&board, &request(2, Symbol::X, 1, 1), Some(&previous)).unwrap_err();
        assert_eq!(err, MoveError::SymbolReused { symbol: Symbol::X });
        assert_eq!(err.kind(), RejectionKind::TurnViolation);
    }

    #[test]
    fn test_alternating_move_accepted() {
        let mut board = Board::new(3);
        board.place(Position::new(0, 0), Symbol::X);
        let previous = committed(1, Symbol::X, 0, 0);
        assert!(validate_move(&board, &request(2, Symbol::O, 1, 1), Some(&previous)).is_ok());
    }
}
