//! Engine configuration.

use std::ops::RangeInclusive;
use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::bot::StrategyKind;

/// Handle reserved for the bot player.
pub const DEFAULT_BOT_HANDLE: &str = "tictactoeai";

/// Settings for board sizes and the bot.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Board size used when a game is created without one.
    #[serde(default = "default_size")]
    default_size: usize,

    /// Smallest board size accepted.
    #[serde(default = "default_min_size")]
    min_size: usize,

    /// Largest board size accepted.
    #[serde(default = "default_max_size")]
    max_size: usize,

    /// Handle of the player that moves for the bot.
    #[serde(default = "default_bot_handle")]
    bot_handle: String,

    /// Strategy the bot uses.
    #[serde(default)]
    bot_strategy: StrategyKind,

    /// Seed for the bot's random choices.
    #[serde(default)]
    seed: Option<u64>,
}

#[instrument]
fn default_size() -> usize {
    3
}

#[instrument]
fn default_min_size() -> usize {
    1
}

#[instrument]
fn default_max_size() -> usize {
    32
}

#[instrument]
fn default_bot_handle() -> String {
    DEFAULT_BOT_HANDLE.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_size: default_size(),
            min_size: default_min_size(),
            max_size: default_max_size(),
            bot_handle: default_bot_handle(),
            bot_strategy: StrategyKind::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a TOML file and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or
    /// the values are inconsistent.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on parse failure or inconsistent values.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        info!(
            default_size = config.default_size,
            bot_handle = %config.bot_handle,
            bot_strategy = %config.bot_strategy,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Checks that the size bounds are usable and the handle is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] describing the first problem found.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_size == 0 {
            return Err(ConfigError::for_field("min_size", "must be at least 1"));
        }
        if self.min_size > self.max_size {
            return Err(ConfigError::for_field(
                "min_size",
                format!("{} exceeds max_size ({})", self.min_size, self.max_size),
            ));
        }
        if !self.size_bounds().contains(&self.default_size) {
            return Err(ConfigError::for_field(
                "default_size",
                format!(
                    "{} outside {}..={}",
                    self.default_size, self.min_size, self.max_size
                ),
            ));
        }
        if self.bot_handle.trim().is_empty() {
            return Err(ConfigError::for_field("bot_handle", "must not be empty"));
        }
        Ok(())
    }

    /// Accepted board sizes.
    pub fn size_bounds(&self) -> RangeInclusive<usize> {
        self.min_size..=self.max_size
    }

    /// Returns a copy using the given default board size.
    pub fn with_default_size(mut self, size: usize) -> Self {
        self.default_size = size;
        self
    }

    /// Returns a copy using the given bot strategy.
    pub fn with_bot_strategy(mut self, strategy: StrategyKind) -> Self {
        self.bot_strategy = strategy;
        self
    }

    /// Returns a copy using the given seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Setting that failed validation, if the error is about one.
    pub field: Option<&'static str>,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            field: None,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Creates an error about one setting. The message is prefixed with
    /// the setting's name.
    #[track_caller]
    pub fn for_field(field: &'static str, message: impl Into<String>) -> Self {
        let mut err = Self::new(format!("{} {}", field, message.into()));
        err.field = Some(field);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(*config.default_size(), 3);
        assert_eq!(config.bot_handle(), DEFAULT_BOT_HANDLE);
        assert_eq!(*config.bot_strategy(), StrategyKind::Random);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_min_above_max_rejected() {
        let err = EngineConfig::from_toml("min_size = 5\nmax_size = 4\ndefault_size = 4").unwrap_err();
        assert!(err.message.contains("exceeds"));
        assert_eq!(err.field, Some("min_size"));
    }

    #[test]
    fn test_default_outside_bounds_rejected() {
        let err = EngineConfig::from_toml("default_size = 40").unwrap_err();
        assert_eq!(err.field, Some("default_size"));
        assert_eq!(err.message, "default_size 40 outside 1..=32");
        assert!(EngineConfig::from_toml("min_size = 0").is_err());
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = EngineConfig::from_toml("bot_strategy = \"minimax\"").unwrap_err();
        assert_eq!(err.field, None);
        assert!(err.message.starts_with("Failed to parse config"));
    }
}
