//! N×N tic-tac-toe engine.
//!
//! Validates moves, detects wins and ties, and drives a game from
//! `created` to `finished` or `tie`. Storage is a collaborator behind
//! [`GameStore`]; single-player games are answered by a pluggable
//! [`BotStrategy`].
//!
//! # Architecture
//!
//! - **Board**: square grid of [`Cell`]s, fixed size
//! - **Rules**: [`validate_move`], [`detect_outcome`]
//! - **Engine**: [`GameEngine`] state machine
//! - **Bot**: [`BotStrategy`] implementations chosen by [`StrategyKind`]
//!
//! # Example
//!
//! ```no_run
//! use tictac_engine::{
//!     EngineConfig, GameEngine, GameStore, MemoryStore, MoveRequest, Position, Symbol,
//! };
//!
//! # async fn example() -> Result<(), tictac_engine::EngineError> {
//! let engine = GameEngine::new(MemoryStore::new(), EngineConfig::default());
//! engine.ensure_bot_player().await?;
//!
//! let alice = engine.store().create_player("alice").await?;
//! let game = engine.create_game(vec![*alice.id()], None).await?;
//! let game = engine
//!     .play_turn(game.id(), MoveRequest::new(*alice.id(), Symbol::X, Position::new(1, 1)))
//!     .await?;
//! println!("{}", game.board().display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bot;
mod config;
mod engine;
mod game;
mod rules;
mod store;
mod types;

pub use bot::{BotStrategy, FirstAvailableStrategy, RandomStrategy, StrategyError, StrategyKind};
pub use config::{ConfigError, DEFAULT_BOT_HANDLE, EngineConfig};
pub use engine::{EngineError, GameEngine};
pub use game::{Game, GameError, GameId, GameStatus, Move, MoveRequest, NewGame, Player, PlayerId};
pub use rules::{
    Line, MoveError, Outcome, RejectionKind, detect_outcome, detect_outcome_concurrent,
    find_winning_line, is_full, scan_anti_diagonal, scan_columns, scan_main_diagonal, scan_rows,
    validate_move,
};
pub use store::{GameStore, MemoryStore, StoreError, StoreErrorKind};
pub use types::{Board, Cell, InvalidCell, NotSquare, Position, Symbol};
