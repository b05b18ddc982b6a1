//! Game configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use puissance_core::Player;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Who plays the first token.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Starter {
    /// The human moves first.
    Human,
    /// The opponent moves first.
    Opponent,
}

impl Starter {
    /// Player holding the first turn.
    pub fn player(self) -> Player {
        match self {
            Starter::Human => crate::HUMAN,
            Starter::Opponent => crate::OPPONENT,
        }
    }
}

/// Settings for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Delay before the opponent moves, in milliseconds.
    #[serde(default = "default_opponent_delay_ms")]
    opponent_delay_ms: u64,

    /// Whether a sound plays for each placed token.
    #[serde(default = "default_token_sound")]
    token_sound: bool,

    /// Seed for the opponent's random fallback. Entropy when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Starter chosen at launch. Prompted for when absent.
    #[serde(default)]
    starter: Option<Starter>,
}

fn default_opponent_delay_ms() -> u64 {
    1000
}

fn default_token_sound() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            opponent_delay_ms: default_opponent_delay_ms(),
            token_sound: default_token_sound(),
            seed: None,
            starter: None,
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            opponent_delay_ms = config.opponent_delay_ms,
            token_sound = config.token_sound,
            seeded = config.seed.is_some(),
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Opponent delay as a duration.
    pub fn opponent_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_delay_ms)
    }

    /// Overrides the opponent delay.
    pub fn with_opponent_delay_ms(mut self, millis: u64) -> Self {
        self.opponent_delay_ms = millis;
        self
    }

    /// Overrides the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Overrides the starter.
    pub fn with_starter(mut self, starter: Starter) -> Self {
        self.starter = Some(starter);
        self
    }

    /// Overrides the token sound flag.
    pub fn with_token_sound(mut self, enabled: bool) -> Self {
        self.token_sound = enabled;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
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
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
