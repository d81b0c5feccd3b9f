//! The game state machine.
//!
//! [`GameEngine`] validates a move, applies it, inspects the board and
//! commits the move, the acting player and the game through a
//! [`GameStore`]. Single-player games get a bot reply through the same
//! path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use derive_more::Display;
use tracing::{debug, error, info, instrument, warn};

use crate::bot::{BotStrategy, StrategyError};
use crate::config::EngineConfig;
use crate::game::{Game, GameError, GameId, GameStatus, Move, MoveRequest, NewGame, Player, PlayerId};
use crate::rules::{MoveError, Outcome, RejectionKind, detect_outcome_concurrent, validate_move};
use crate::store::{GameStore, StoreError};

/// Error returned by engine operations.
#[derive(Debug, Clone, Display)]
pub enum EngineError {
    /// Move off the board or onto an occupied cell.
    #[display("Invalid move: {}", _0)]
    InvalidMove(MoveError),

    /// Move out of turn or with the previous move's symbol.
    #[display("Turn violation: {}", _0)]
    TurnViolation(MoveError),

    /// The game already reached a terminal status.
    #[display("Game {} was already finished ({})", game, status)]
    GameOver {
        /// The game.
        game: GameId,
        /// Its terminal status.
        status: GameStatus,
    },

    /// A referenced record does not exist.
    #[display("{} {} not found", entity, key)]
    NotFound {
        /// Kind of record.
        entity: &'static str,
        /// Key that was looked up.
        key: String,
    },

    /// The store failed.
    #[display("{}", _0)]
    Store(StoreError),

    /// The bot could not choose a move.
    #[display("Bot failed: {}", _0)]
    Strategy(StrategyError),

    /// The game could not be created.
    #[display("Invalid game: {}", _0)]
    Game(GameError),
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::InvalidMove(e) | EngineError::TurnViolation(e) => Some(e),
            EngineError::Store(e) => Some(e),
            EngineError::Strategy(e) => Some(e),
            EngineError::Game(e) => Some(e),
            EngineError::GameOver { .. } | EngineError::NotFound { .. } => None,
        }
    }
}

impl From<MoveError> for EngineError {
    fn from(err: MoveError) -> Self {
        match err.kind() {
            RejectionKind::Invalid => EngineError::InvalidMove(err),
            RejectionKind::TurnViolation => EngineError::TurnViolation(err),
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::Store(err)
    }
}

impl From<StrategyError> for EngineError {
    fn from(err: StrategyError) -> Self {
        EngineError::Strategy(err)
    }
}

impl From<GameError> for EngineError {
    fn from(err: GameError) -> Self {
        EngineError::Game(err)
    }
}

impl EngineError {
    /// The rejection class when the move itself was refused.
    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        match self {
            EngineError::InvalidMove(_) => Some(RejectionKind::Invalid),
            EngineError::TurnViolation(_) => Some(RejectionKind::TurnViolation),
            _ => None,
        }
    }

    fn not_found(entity: &'static str, key: impl ToString) -> Self {
        EngineError::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Per-game async locks for the read-validate-write sequence.
///
/// An entry lives only while some turn holds or waits on it.
#[derive(Debug, Default)]
struct GameLocks {
    locks: Mutex<HashMap<GameId, Arc<tokio::sync::Mutex<()>>>>,
}

impl GameLocks {
    fn slot(&self, game: GameId) -> LockSlot<'_> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = locks.entry(game).or_default().clone();
        LockSlot {
            locks: self,
            game,
            lock,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// A claim on one game's lock. Dropping the last claim removes the entry.
struct LockSlot<'a> {
    locks: &'a GameLocks,
    game: GameId,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl LockSlot<'_> {
    async fn acquire(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for LockSlot<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Clones are only taken under the map lock: the map and this slot
        // are the last two holders.
        if Arc::strong_count(&self.lock) <= 2 {
            locks.remove(&self.game);
            debug!(game_id = %self.game, "Released game lock");
        }
    }
}

/// Runs moves against games held by a store.
#[derive(Debug)]
pub struct GameEngine<S> {
    store: S,
    strategy: Box<dyn BotStrategy>,
    config: EngineConfig,
    locks: GameLocks,
}

impl<S: GameStore> GameEngine<S> {
    /// Creates an engine using the strategy named in `config`.
    #[instrument(skip(store))]
    pub fn new(store: S, config: EngineConfig) -> Self {
        let strategy = config.bot_strategy().build(*config.seed());
        Self::with_strategy(store, config, strategy)
    }

    /// Creates an engine with an explicit bot strategy.
    #[instrument(skip(store, config, strategy), fields(strategy = strategy.name()))]
    pub fn with_strategy(store: S, config: EngineConfig, strategy: Box<dyn BotStrategy>) -> Self {
        info!(bot_handle = %config.bot_handle(), "Creating game engine");
        Self {
            store,
            strategy,
            config,
            locks: GameLocks::default(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The bot's strategy.
    pub fn strategy(&self) -> &dyn BotStrategy {
        self.strategy.as_ref()
    }

    /// Returns the bot player, creating it if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] if the lookup or creation fails.
    #[instrument(skip(self))]
    pub async fn ensure_bot_player(&self) -> Result<Player, EngineError> {
        let handle = self.config.bot_handle();
        if let Some(bot) = self.store.find_player_by_handle(handle).await? {
            debug!(bot_id = %bot.id(), "Bot player exists");
            return Ok(bot);
        }
        let bot = self.store.create_player(handle).await?;
        info!(bot_id = %bot.id(), handle = %handle, "Bot player created");
        Ok(bot)
    }

    /// Creates a game for one or two players.
    ///
    /// `size` defaults to the configured board size.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Game`] for a bad player list or size,
    /// [`EngineError::NotFound`] for an unknown player, or a store error.
    #[instrument(skip(self))]
    pub async fn create_game(
        &self,
        players: Vec<PlayerId>,
        size: Option<usize>,
    ) -> Result<Game, EngineError> {
        let size = size.unwrap_or(*self.config.default_size());
        let new_game = NewGame::new(players, size, self.config.size_bounds())?;
        for &player in new_game.players() {
            if self.store.find_player(player).await?.is_none() {
                warn!(%player, "Unknown player in new game");
                return Err(EngineError::not_found("Player", player));
            }
        }
        let game = self.store.create_game(new_game).await?;
        info!(game_id = %game.id(), size, multiplayer = game.multiplayer(), "Game created");
        Ok(game)
    }

    /// Looks up a game.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the game does not exist.
    #[instrument(skip(self))]
    pub async fn game(&self, id: GameId) -> Result<Game, EngineError> {
        self.store
            .find_game(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Game", id))
    }

    /// Every move of a game, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] for an unknown game or a store error.
    #[instrument(skip(self))]
    pub async fn history(&self, id: GameId) -> Result<Vec<Move>, EngineError> {
        self.game(id).await?;
        Ok(self.store.moves(id).await?)
    }

    /// Applies one move and commits the result.
    ///
    /// On rejection nothing is written; reload the game to retry.
    ///
    /// # Errors
    ///
    /// - [`EngineError::GameOver`] for a terminal game
    /// - [`EngineError::NotFound`] for an unknown acting player
    /// - [`EngineError::InvalidMove`] / [`EngineError::TurnViolation`] when
    ///   validation fails
    /// - [`EngineError::Store`] if any read or write fails
    #[instrument(skip(self, game), fields(game_id = %game.id(), player = %request.player, position = %request.position))]
    pub async fn execute_move(&self, game: Game, request: MoveRequest) -> Result<Game, EngineError> {
        self.commit_move(game, request).await.map(|(game, _)| game)
    }

    /// Builds the bot's reply to `previous`.
    ///
    /// The bot plays the symbol `previous` did not use.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the bot player is missing, or
    /// [`EngineError::Strategy`] if the board is full.
    #[instrument(skip(self, game, previous), fields(game_id = %game.id(), strategy = self.strategy.name()))]
    pub async fn bot_move(&self, game: &Game, previous: &Move) -> Result<MoveRequest, EngineError> {
        let handle = self.config.bot_handle();
        let bot = self
            .store
            .find_player_by_handle(handle)
            .await?
            .ok_or_else(|| EngineError::not_found("Player", handle))?;
        let position = self.strategy.choose_move(game.board())?;
        let symbol = previous.symbol().opponent();
        debug!(%position, %symbol, "Bot chose move");
        Ok(MoveRequest::new(*bot.id(), symbol, position))
    }

    /// Plays one turn: the caller's move, then the bot's reply when the
    /// game is single-player and still running.
    ///
    /// Turns on the same game are serialized.
    ///
    /// # Errors
    ///
    /// Anything [`GameEngine::execute_move`] or [`GameEngine::bot_move`]
    /// returns, plus [`EngineError::NotFound`] for an unknown game.
    #[instrument(skip(self), fields(player = %request.player, position = %request.position))]
    pub async fn play_turn(&self, game_id: GameId, request: MoveRequest) -> Result<Game, EngineError> {
        self.game(game_id).await?;

        let slot = self.locks.slot(game_id);
        let _guard = slot.acquire().await;

        let game = self.game(game_id).await?;
        let (game, played) = self.commit_move(game, request).await?;

        if game.multiplayer() || game.status() != GameStatus::InProgress {
            return Ok(game);
        }

        let reply = self.bot_move(&game, &played).await?;
        let (game, _) = self.commit_move(game, reply).await?;
        Ok(game)
    }

    async fn commit_move(&self, mut game: Game, request: MoveRequest) -> Result<(Game, Move), EngineError> {
        if game.status().is_terminal() {
            warn!(status = %game.status(), "Move against finished game");
            return Err(EngineError::GameOver {
                game: game.id(),
                status: game.status(),
            });
        }

        let mut player = self
            .store
            .find_player(request.player)
            .await?
            .ok_or_else(|| EngineError::not_found("Player", request.player))?;

        let previous = self.store.latest_move(game.id()).await?;
        validate_move(game.board(), &request, previous.as_ref())?;

        let played = Move::new(game.id(), request);
        game.place(request.position, request.symbol);
        game.set_status(GameStatus::InProgress);

        match detect_outcome_concurrent(game.board()).await {
            Outcome::Win(line) => {
                game.finish(*player.id());
                player.record_victory();
                info!(winner = %player.id(), %line, victories = player.victories(), "Game won");
            }
            Outcome::Tie => {
                game.set_status(GameStatus::Tie);
                info!("Game tied");
            }
            Outcome::Ongoing => debug!("Game continues"),
        }

        self.persist(&played, &player, &game).await?;
        Ok((game, played))
    }

    /// Writes the three records concurrently and waits for all of them.
    ///
    /// There is no rollback: a failed write leaves the others in place.
    async fn persist(&self, played: &Move, player: &Player, game: &Game) -> Result<(), EngineError> {
        let (move_written, player_written, game_written) = tokio::join!(
            self.store.append_move(played),
            self.store.save_player(player),
            self.store.save_game(game),
        );

        let mut first_failure = None;
        for (record, result) in [
            ("move", move_written),
            ("player", player_written),
            ("game", game_written),
        ] {
            if let Err(e) = result {
                error!(record, error = %e, "Write failed");
                first_failure.get_or_insert(e);
            }
        }

        match first_failure {
            Some(e) => Err(EngineError::Store(e)),
            None => {
                debug!(status = %game.status(), "Move committed");
                Ok(())
            }
        }
    }
}
