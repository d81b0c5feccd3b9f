//! Game, player and move records.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::types::{Board, Position, Symbol};

/// Identifier of a stored game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GameId(u64);

/// Identifier of a stored player.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(u64);

/// Lifecycle status of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    /// Created, no move played yet.
    Created,
    /// At least one move played, no result yet.
    InProgress,
    /// Board full with no winning line.
    Tie,
    /// A player completed a line.
    Finished,
}

impl GameStatus {
    /// Terminal games accept no further moves.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Tie | GameStatus::Finished)
    }
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Player {
    /// Player id.
    id: PlayerId,
    /// Unique handle.
    handle: String,
    /// Number of games won.
    victories: u32,
    /// When the player was registered.
    created_at: DateTime<Utc>,
}

impl Player {
    /// Creates a player with no victories.
    pub fn new(id: PlayerId, handle: impl Into<String>) -> Self {
        Self {
            id,
            handle: handle.into(),
            victories: 0,
            created_at: Utc::now(),
        }
    }

    pub(crate) fn record_victory(&mut self) {
        self.victories += 1;
    }
}

/// Error raised when a game cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// No players supplied.
    #[display("There should be at least one player")]
    NoPlayers,

    /// More than two players supplied.
    #[display("Maximum two players, got {}", count)]
    TooManyPlayers {
        /// Number of players supplied.
        count: usize,
    },

    /// The same player listed twice.
    #[display("Player {} listed more than once", player)]
    DuplicatePlayer {
        /// The repeated player.
        player: PlayerId,
    },

    /// Board size outside the allowed range.
    #[display("Board size {} outside allowed range {}..={}", size, min, max)]
    SizeOutOfRange {
        /// Requested size.
        size: usize,
        /// Smallest allowed size.
        min: usize,
        /// Largest allowed size.
        max: usize,
    },
}

/// A validated request to create a game.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct NewGame {
    /// Players in seating order.
    players: Vec<PlayerId>,
    /// Board side length.
    size: usize,
}

impl NewGame {
    /// Validates the player list and board size.
    ///
    /// # Errors
    ///
    /// Returns [`GameError`] for zero players, more than two, a repeated
    /// player, or a size outside `size_bounds`.
    #[instrument(skip(players), fields(players = players.len()))]
    pub fn new(
        players: Vec<PlayerId>,
        size: usize,
        size_bounds: RangeInclusive<usize>,
    ) -> Result<Self, GameError> {
        if players.is_empty() {
            warn!("Rejected game without players");
            return Err(GameError::NoPlayers);
        }
        if players.len() > 2 {
            warn!(count = players.len(), "Rejected game with too many players");
            return Err(GameError::TooManyPlayers {
                count: players.len(),
            });
        }
        if players.len() == 2 && players[0] == players[1] {
            warn!(player = %players[0], "Rejected game with repeated player");
            return Err(GameError::DuplicatePlayer { player: players[0] });
        }
        if !size_bounds.contains(&size) {
            warn!(size, "Rejected board size");
            return Err(GameError::SizeOutOfRange {
                size,
                min: *size_bounds.start(),
                max: *size_bounds.end(),
            });
        }
        Ok(Self { players, size })
    }
}

/// A game of N×N tic-tac-toe.
///
/// Only the engine changes board, status and winner once a game exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    players: Vec<PlayerId>,
    multiplayer: bool,
    board: Board,
    status: GameStatus,
    winner: Option<PlayerId>,
    created_at: DateTime<Utc>,
}

impl Game {
    /// Builds a fresh game with an empty board and `created` status.
    #[instrument(skip(new_game), fields(size = new_game.size))]
    pub fn create(id: GameId, new_game: NewGame) -> Self {
        let multiplayer = new_game.players.len() == 2;
        debug!(%id, multiplayer, "Creating game");
        Self {
            id,
            players: new_game.players,
            multiplayer,
            board: Board::new(new_game.size),
            status: GameStatus::Created,
            winner: None,
            created_at: Utc::now(),
        }
    }

    /// Game id.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Players in seating order.
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// True iff two players are seated.
    pub fn multiplayer(&self) -> bool {
        self.multiplayer
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board side length.
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Winner, set only once the game is finished.
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn place(&mut self, pos: Position, symbol: Symbol) -> bool {
        self.board.place(pos, symbol)
    }

    pub(crate) fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    pub(crate) fn finish(&mut self, winner: PlayerId) {
        self.status = GameStatus::Finished;
        self.winner = Some(winner);
    }
}

/// A candidate move as supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MoveRequest {
    /// The acting player.
    pub player: PlayerId,
    /// Symbol to place.
    pub symbol: Symbol,
    /// Target cell.
    pub position: Position,
}

/// A committed move. Never edited once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Move {
    /// The game this move belongs to.
    game: GameId,
    /// The acting player.
    player: PlayerId,
    /// Symbol placed.
    symbol: Symbol,
    /// Target cell.
    position: Position,
    /// When the move was made.
    created_at: DateTime<Utc>,
}

impl Move {
    /// Binds a request to a game.
    pub fn new(game: GameId, request: MoveRequest) -> Self {
        Self {
            game,
            player: request.player,
            symbol: request.symbol,
            position: request.position,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} plays {} at {}", self.player, self.symbol, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<PlayerId> {
        raw.iter().copied().map(PlayerId::from).collect()
    }

    #[test]
    fn test_new_game_requires_players() {
        assert_eq!(NewGame::new(vec![], 3, 1..=10), Err(GameError::NoPlayers));
    }

    #[test]
    fn test_new_game_caps_at_two_players() {
        assert_eq!(
            NewGame::new(ids(&[1, 2, 3]), 3, 1..=10),
            Err(GameError::TooManyPlayers { count: 3 })
        );
    }

    #[test]
    fn test_new_game_rejects_duplicate_player() {
        assert!(matches!(
            NewGame::new(ids(&[4, 4]), 3, 1..=10),
            Err(GameError::DuplicatePlayer { .. })
        ));
    }

    #[test]
    fn test_new_game_size_bounds() {
        assert!(NewGame::new(ids(&[1]), 0, 1..=10).is_err());
        assert!(NewGame::new(ids(&[1]), 11, 1..=10).is_err());
        assert!(NewGame::new(ids(&[1]), 10, 1..=10).is_ok());
    }

    #[test]
    fn test_multiplayer_derived_from_player_count() {
        let single = Game::create(GameId::from(1), NewGame::new(ids(&[1]), 3, 1..=10).unwrap());
        let double = Game::create(GameId::from(2), NewGame::new(ids(&[1, 2]), 3, 1..=10).unwrap());
        assert!(!single.multiplayer());
        assert!(double.multiplayer());
        assert_eq!(single.status(), GameStatus::Created);
        assert_eq!(single.winner(), None);
        assert_eq!(double.size(), 3);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!GameStatus::Created.is_terminal());
        assert!(!GameStatus::InProgress.is_terminal());
        assert!(GameStatus::Tie.is_terminal());
        assert!(GameStatus::Finished.is_terminal());
        assert_eq!(GameStatus::InProgress.to_string(), "in_progress");
    }
}
