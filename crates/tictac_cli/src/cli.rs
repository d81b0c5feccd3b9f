//! Command-line interface for tictac.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tictac_engine::{Position, StrategyKind};

/// Tictac - N×N tic-tac-toe engine harness
#[derive(Parser, Debug)]
#[command(name = "tictac")]
#[command(about = "Play and simulate N×N tic-tac-toe", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to engine configuration (defaults are used if missing)
    #[arg(short, long, global = true, default_value = "tictac.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play bot against bot and report the results
    Simulate {
        /// Number of games to play
        #[arg(short, long, default_value = "1")]
        games: u32,

        /// Board size (configured default if omitted)
        #[arg(short, long)]
        size: Option<usize>,

        /// Strategy for the X side
        #[arg(long, default_value = "random")]
        x_strategy: StrategyKind,

        /// Strategy for the O side
        #[arg(long, default_value = "first-available")]
        o_strategy: StrategyKind,

        /// Seed for reproducible random play
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play against the bot with a scripted list of moves
    Play {
        /// Board size (configured default if omitted)
        #[arg(short, long)]
        size: Option<usize>,

        /// Your moves as `row,column`, played as X
        #[arg(required = true, value_parser = parse_position)]
        moves: Vec<Position>,
    },
}

/// Parses `row,column` into a [`Position`].
pub fn parse_position(input: &str) -> Result<Position, String> {
    let (row, column) = input
        .split_once(',')
        .ok_or_else(|| format!("expected row,column but got '{}'", input))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("bad row '{}': {}", row, e))?;
    let column = column
        .trim()
        .parse()
        .map_err(|e| format!("bad column '{}': {}", column, e))?;
    Ok(Position::new(row, column))
}
