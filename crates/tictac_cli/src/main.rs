//! Tictac - CLI harness for the tic-tac-toe engine.
//!
//! Drives [`tictac_engine::GameEngine`] against an in-memory store.

#![warn(missing_docs)]

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tictac_engine::{
    EngineConfig, EngineError, GameEngine, GameStatus, GameStore, MemoryStore, MoveRequest,
    Position, RejectionKind, StrategyKind, Symbol,
};
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Command::Simulate {
            games,
            size,
            x_strategy,
            o_strategy,
            seed,
        } => run_simulation(config, games, size, x_strategy, o_strategy, seed).await,
        Command::Play { size, moves } => run_play(config, size, moves).await,
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tictac_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[instrument(fields(path = %config_path.display()))]
fn load_config(config_path: &Path) -> Result<EngineConfig> {
    if config_path.exists() {
        info!("Loading engine configuration");
        EngineConfig::from_file(config_path)
            .with_context(|| format!("loading {}", config_path.display()))
    } else {
        debug!("Config file not found, using defaults");
        Ok(EngineConfig::default())
    }
}

/// Tally of simulated games.
#[derive(Debug, Default)]
struct Tally {
    x_wins: u32,
    o_wins: u32,
    ties: u32,
}

/// Plays bot against bot, each side choosing with its own strategy.
#[instrument(skip(config))]
async fn run_simulation(
    config: EngineConfig,
    games: u32,
    size: Option<usize>,
    x_strategy: StrategyKind,
    o_strategy: StrategyKind,
    seed: Option<u64>,
) -> Result<()> {
    let engine = GameEngine::new(MemoryStore::new(), config);
    let x_player = engine.store().create_player("x-bot").await?;
    let o_player = engine.store().create_player("o-bot").await?;
    let x_bot = x_strategy.build(seed);
    let o_bot = o_strategy.build(seed.map(|s| s.wrapping_add(1)));

    let mut tally = Tally::default();
    for round in 0..games {
        let mut game = engine
            .create_game(vec![*x_player.id(), *o_player.id()], size)
            .await?;
        let mut symbol = Symbol::X;

        while !game.status().is_terminal() {
            let (player, bot) = match symbol {
                Symbol::X => (&x_player, &x_bot),
                Symbol::O => (&o_player, &o_bot),
            };
            let position = bot.choose_move(game.board())?;
            game = engine
                .execute_move(game, MoveRequest::new(*player.id(), symbol, position))
                .await?;
            symbol = symbol.opponent();
        }

        match game.winner() {
            Some(winner) if winner == *x_player.id() => tally.x_wins += 1,
            Some(_) => tally.o_wins += 1,
            None => tally.ties += 1,
        }
        info!(round, status = %game.status(), "Game over");
        if games == 1 {
            println!("{}\n", game.board().display());
        }
    }

    println!(
        "{} games: X ({}) won {}, O ({}) won {}, {} tied",
        games, x_strategy, tally.x_wins, o_strategy, tally.o_wins, tally.ties
    );
    Ok(())
}

/// Plays the given moves as X against the bot.
#[instrument(skip(config, moves), fields(moves = moves.len()))]
async fn run_play(config: EngineConfig, size: Option<usize>, moves: Vec<Position>) -> Result<()> {
    let engine = GameEngine::new(MemoryStore::new(), config);
    engine.ensure_bot_player().await?;
    let human = engine.store().create_player("human").await?;
    let mut game = engine.create_game(vec![*human.id()], size).await?;

    for position in moves {
        let request = MoveRequest::new(*human.id(), Symbol::X, position);
        match engine.play_turn(game.id(), request).await {
            Ok(next) => game = next,
            Err(e) if e.rejection_kind() == Some(RejectionKind::Invalid) => {
                warn!(%position, error = %e, "Move rejected, skipping");
                println!("Skipped {}: {}", position, e);
                continue;
            }
            Err(e @ EngineError::GameOver { .. }) => {
                println!("{}", e);
                break;
            }
            Err(e) => return Err(e.into()),
        }

        println!("{}\n", game.board().display());
        if game.status().is_terminal() {
            break;
        }
    }

    match game.status() {
        GameStatus::Finished if game.winner() == Some(*human.id()) => println!("You win"),
        GameStatus::Finished => println!("{} wins", engine.config().bot_handle()),
        GameStatus::Tie => println!("Tie"),
        GameStatus::Created | GameStatus::InProgress => println!("Game unfinished"),
    }
    Ok(())
}
