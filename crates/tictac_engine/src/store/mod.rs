//! Storage collaborator used by the engine.
//!
//! The engine never talks to a database directly. It reads and writes
//! games, players and moves through [`GameStore`]; how they are kept is
//! the implementor's business. [`MemoryStore`] keeps everything in
//! process.

mod error;
mod memory;

pub use error::{StoreError, StoreErrorKind};
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::game::{Game, GameId, Move, NewGame, Player, PlayerId};

/// Persistence operations the engine depends on.
///
/// Writes for different records are independent; no method is expected
/// to be atomic with any other.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Registers a player with a fresh id.
    ///
    /// # Errors
    ///
    /// Fails if the handle is taken or the store is unavailable.
    async fn create_player(&self, handle: &str) -> Result<Player, StoreError>;

    /// Looks up a player by id.
    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError>;

    /// Looks up a player by handle.
    async fn find_player_by_handle(&self, handle: &str) -> Result<Option<Player>, StoreError>;

    /// Overwrites a stored player.
    async fn save_player(&self, player: &Player) -> Result<(), StoreError>;

    /// Stores a new game with a fresh id.
    async fn create_game(&self, new_game: NewGame) -> Result<Game, StoreError>;

    /// Looks up a game by id.
    async fn find_game(&self, id: GameId) -> Result<Option<Game>, StoreError>;

    /// Overwrites a stored game.
    async fn save_game(&self, game: &Game) -> Result<(), StoreError>;

    /// Returns the most recently appended move of a game, if any.
    async fn latest_move(&self, game: GameId) -> Result<Option<Move>, StoreError>;

    /// Appends a move to its game's history.
    async fn append_move(&self, mv: &Move) -> Result<(), StoreError>;

    /// Returns every move of a game in the order they were appended.
    async fn moves(&self, game: GameId) -> Result<Vec<Move>, StoreError>;
}
