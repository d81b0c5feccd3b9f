//! Uniform random choice among empty cells.

use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use super::{BotStrategy, StrategyError};
use crate::types::{Board, Position};

/// Picks any empty cell with equal probability.
#[derive(Debug)]
pub struct RandomStrategy {
    rng: Mutex<StdRng>,
}

impl RandomStrategy {
    /// Creates a strategy seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Creates a strategy with a fixed seed, for reproducible games.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStrategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    #[instrument(skip(self, board), fields(size = board.size()))]
    fn choose_move(&self, board: &Board) -> Result<Position, StrategyError> {
        let available = board.empty_positions();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let choice = available
            .choose(&mut *rng)
            .copied()
            .ok_or(StrategyError::BoardFull { size: board.size() })?;
        debug!(available = available.len(), %choice, "Random cell chosen");
        Ok(choice)
    }
}
