//! Slot engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paytable::{PayTable, Payline, standard_10_paylines, validate_paylines};
use crate::symbols::SymbolWeights;

/// Number of reels (columns)
pub const REELS: usize = 5;
/// Number of visible rows per reel
pub const ROWS: usize = 3;
/// Fixed payline count
pub const LINES: usize = 10;

/// Player-facing session defaults and bet limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Balance a new engine starts with (coins)
    pub starting_balance: u64,
    /// Initial bet per line
    pub bet_per_line: u32,
    /// Lowest allowed bet per line
    pub min_bet: u32,
    /// Highest allowed bet per line
    pub max_bet: u32,
    /// Bet per line selected by the "max bet" shortcut
    pub max_bet_preset: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1000,
            bet_per_line: 1,
            min_bet: 1,
            max_bet: 100,
            max_bet_preset: 10,
        }
    }
}

impl SessionConfig {
    /// Clamp a bet per line into the allowed range
    pub fn clamp_bet(&self, bet: i64) -> u32 {
        bet.clamp(i64::from(self.min_bet), i64::from(self.max_bet)) as u32
    }

    /// Is `bet` inside the allowed range?
    pub fn bet_in_range(&self, bet: u32) -> bool {
        (self.min_bet..=self.max_bet).contains(&bet)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.min_bet >= 1
            && self.min_bet <= self.max_bet
            && self.bet_in_range(self.bet_per_line)
            && self.bet_in_range(self.max_bet_preset);
        if !ok {
            return Err(ConfigError::BetRange {
                min: self.min_bet,
                max: self.max_bet,
                default: self.bet_per_line,
            });
        }
        Ok(())
    }
}

/// Complete game configuration: loaded once, validated once, then shared read-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game name
    #[serde(default = "default_name")]
    pub name: String,
    /// Symbol draw weights
    #[serde(default)]
    pub weights: SymbolWeights,
    /// Payline definitions
    #[serde(default = "standard_10_paylines")]
    pub paylines: Vec<Payline>,
    /// Line pays, scatter pays and free spin tiers
    #[serde(default)]
    pub paytable: PayTable,
    /// Session defaults and bet limits
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_name() -> String {
    "Doghouse".into()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            weights: SymbolWeights::standard(),
            paylines: standard_10_paylines(),
            paytable: PayTable::standard(),
            session: SessionConfig::default(),
        }
    }
}

impl GameConfig {
    /// Replace the weight table
    pub fn with_weights(mut self, weights: SymbolWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Replace the session defaults
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Total bet for a bet per line
    pub fn total_bet(&self, bet_per_line: u32) -> u64 {
        u64::from(bet_per_line) * self.paylines.len() as u64
    }

    /// Check every table; configuration is trusted after this passes
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        validate_paylines(&self.paylines, LINES)?;
        self.paytable.validate()?;
        self.session.validate()?;
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML config
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_yml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        log::debug!("Loading game config from {}", path.display());
        if is_yaml {
            Self::from_yaml(&text)
        } else {
            Self::from_json(&text)
        }
    }

    /// Export as pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Export as YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
