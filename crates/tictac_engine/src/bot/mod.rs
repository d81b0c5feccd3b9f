//! Bot move selection.
//!
//! A [`BotStrategy`] picks a cell for the bot given the current board.
//! Strategies are selected by [`StrategyKind`] and used behind a trait
//! object, so new ones plug in without touching the engine.

mod first_available;
mod random;

pub use first_available::FirstAvailableStrategy;
pub use random::RandomStrategy;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::types::{Board, Position};

/// Error raised when a strategy cannot produce a move.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum StrategyError {
    /// No empty cell is left.
    #[display("No empty cell left on a {}x{} board", size, size)]
    BoardFull {
        /// Board side length.
        size: usize,
    },
}

/// Move-selection algorithm for the bot.
pub trait BotStrategy: Send + Sync + std::fmt::Debug {
    /// Short name used in logs and configuration.
    fn name(&self) -> &str;

    /// Chooses an empty cell on `board`.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::BoardFull`] when no cell is empty. Callers
    /// should not ask for a move on a full board.
    fn choose_move(&self, board: &Board) -> Result<Position, StrategyError>;
}

/// Registered strategy variants.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StrategyKind {
    /// Uniform choice among empty cells.
    #[default]
    Random,
    /// First empty cell in row-major order.
    FirstAvailable,
}

impl StrategyKind {
    /// Builds the strategy. `seed` makes random choices reproducible.
    #[instrument]
    pub fn build(self, seed: Option<u64>) -> Box<dyn BotStrategy> {
        match self {
            StrategyKind::Random => match seed {
                Some(seed) => Box::new(RandomStrategy::with_seed(seed)),
                None => Box::new(RandomStrategy::new()),
            },
            StrategyKind::FirstAvailable => Box::new(FirstAvailableStrategy),
        }
    }
}
