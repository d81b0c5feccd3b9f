//! In-process store backed by hash maps.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::{GameStore, StoreError};
use crate::game::{Game, GameId, Move, NewGame, Player, PlayerId};

#[derive(Debug, Default)]
struct Tables {
    next_player: u64,
    next_game: u64,
    players: HashMap<PlayerId, Player>,
    handles: HashMap<String, PlayerId>,
    games: HashMap<GameId, Game>,
    moves: HashMap<GameId, Vec<Move>>,
}

/// Keeps games, players and moves in memory.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory store");
        Self::default()
    }
}

#[async_trait]
impl GameStore for MemoryStore {
    #[instrument(skip(self))]
    async fn create_player(&self, handle: &str) -> Result<Player, StoreError> {
        let mut tables = self.tables.lock()?;
        if tables.handles.contains_key(handle) {
            warn!(handle, "Handle already taken");
            return Err(StoreError::conflict(format!("Handle '{}' is already taken", handle)));
        }
        tables.next_player += 1;
        let id = PlayerId::from(tables.next_player);
        let player = Player::new(id, handle);
        tables.handles.insert(handle.to_string(), id);
        tables.players.insert(id, player.clone());
        info!(%id, handle, "Player created");
        Ok(player)
    }

    #[instrument(skip(self))]
    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        let tables = self.tables.lock()?;
        Ok(tables.players.get(&id).cloned())
    }

    #[instrument(skip(self))]
    async fn find_player_by_handle(&self, handle: &str) -> Result<Option<Player>, StoreError> {
        let tables = self.tables.lock()?;
        let player = tables
            .handles
            .get(handle)
            .and_then(|id| tables.players.get(id))
            .cloned();
        if player.is_none() {
            debug!(handle, "No player with handle");
        }
        Ok(player)
    }

    #[instrument(skip(self, player), fields(player_id = %player.id()))]
    async fn save_player(&self, player: &Player) -> Result<(), StoreError> {
        let mut tables = self.tables.lock()?;
        match tables.players.get_mut(player.id()) {
            Some(stored) => {
                *stored = player.clone();
                debug!(victories = player.victories(), "Player saved");
                Ok(())
            }
            None => Err(StoreError::missing(format!("Player {} does not exist", player.id()))),
        }
    }

    #[instrument(skip(self, new_game))]
    async fn create_game(&self, new_game: NewGame) -> Result<Game, StoreError> {
        let mut tables = self.tables.lock()?;
        tables.next_game += 1;
        let id = GameId::from(tables.next_game);
        let game = Game::create(id, new_game);
        tables.games.insert(id, game.clone());
        tables.moves.insert(id, Vec::new());
        info!(%id, size = game.size(), multiplayer = game.multiplayer(), "Game created");
        Ok(game)
    }

    #[instrument(skip(self))]
    async fn find_game(&self, id: GameId) -> Result<Option<Game>, StoreError> {
        let tables = self.tables.lock()?;
        Ok(tables.games.get(&id).cloned())
    }

    #[instrument(skip(self, game), fields(game_id = %game.id(), status = %game.status()))]
    async fn save_game(&self, game: &Game) -> Result<(), StoreError> {
        let mut tables = self.tables.lock()?;
        match tables.games.get_mut(&game.id()) {
            Some(stored) => {
                *stored = game.clone();
                debug!("Game saved");
                Ok(())
            }
            None => Err(StoreError::missing(format!("Game {} does not exist", game.id()))),
        }
    }

    #[instrument(skip(self))]
    async fn latest_move(&self, game: GameId) -> Result<Option<Move>, StoreError> {
        let tables = self.tables.lock()?;
        Ok(tables.moves.get(&game).and_then(|moves| moves.last()).cloned())
    }

    #[instrument(skip(self, mv), fields(game_id = %mv.game()))]
    async fn append_move(&self, mv: &Move) -> Result<(), StoreError> {
        let mut tables = self.tables.lock()?;
        match tables.moves.get_mut(mv.game()) {
            Some(history) => {
                history.push(mv.clone());
                debug!(count = history.len(), "Move appended");
                Ok(())
            }
            None => Err(StoreError::missing(format!("Game {} does not exist", mv.game()))),
        }
    }

    #[instrument(skip(self))]
    async fn moves(&self, game: GameId) -> Result<Vec<Move>, StoreError> {
        let tables = self.tables.lock()?;
        Ok(tables.moves.get(&game).cloned().unwrap_or_default())
    }
}
