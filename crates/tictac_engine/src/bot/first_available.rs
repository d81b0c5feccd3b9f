//! Deterministic strategy: first empty cell.

use tracing::{debug, instrument};

use super::{BotStrategy, StrategyError};
use crate::types::{Board, Position};

/// Picks the first empty cell in row-major order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstAvailableStrategy;

impl BotStrategy for FirstAvailableStrategy {
    fn name(&self) -> &str {
        "first-available"
    }

    #[instrument(skip(self, board), fields(size = board.size()))]
    fn choose_move(&self, board: &Board) -> Result<Position, StrategyError> {
        let choice = board
            .empty_positions()
            .first()
            .copied()
            .ok_or(StrategyError::BoardFull { size: board.size() })?;
        debug!(%choice, "First empty cell chosen");
        Ok(choice)
    }
}
