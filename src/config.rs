//! Game configuration with validation, defaults and TOML loading
//!
//! A `GameConfig` is fixed for the life of a session and passed explicitly
//! into every engine call. Nothing in the crate reads a global config.

use crate::errors::{ConfigurationError, EngineResult};
use crate::games::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Immutable per-session game parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub initial_balance: Money,
    pub target_balance: Money,
    pub min_wager: Money,
    /// Probability that the favored side (`Side::A`) comes up
    pub side_a_bias: f64,
    pub session_duration_ms: u64,
    /// Quick-bet chips expressed as a percentage of the current balance
    pub quick_chip_percentages: Vec<u32>,
    /// Quick-bet chips with a fixed amount
    pub quick_chip_amounts: Vec<Money>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_balance: dec!(25.00),
            target_balance: dec!(150.00),
            min_wager: dec!(0.01),
            side_a_bias: 0.6,
            session_duration_ms: 5 * 60 * 1000,
            quick_chip_percentages: vec![10, 15, 20, 30, 40],
            quick_chip_amounts: vec![
                dec!(0.25),
                dec!(0.50),
                dec!(1.00),
                dec!(2.00),
                dec!(3.00),
                dec!(5.00),
            ],
        }
    }
}

impl GameConfig {
    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.min_wager <= Decimal::ZERO {
            return Err(ConfigurationError::invalid(
                "min_wager",
                self.min_wager,
                "must be an amount > 0",
            ));
        }

        if !(self.side_a_bias > 0.0 && self.side_a_bias < 1.0) {
            return Err(ConfigurationError::invalid(
                "side_a_bias",
                self.side_a_bias,
                "must lie strictly between 0 and 1",
            ));
        }

        if self.initial_balance.is_sign_negative() {
            return Err(ConfigurationError::invalid(
                "initial_balance",
                self.initial_balance,
                "must be a non-negative amount",
            ));
        }

        if self.target_balance <= self.initial_balance {
            return Err(ConfigurationError::invalid(
                "target_balance",
                self.target_balance,
                "must be greater than initial_balance",
            ));
        }

        if self.session_duration_ms == 0 {
            return Err(ConfigurationError::invalid(
                "session_duration_ms",
                0,
                "session duration cannot be zero",
            ));
        }

        if let Some(pct) = self
            .quick_chip_percentages
            .iter()
            .find(|pct| **pct == 0 || **pct > 100)
        {
            return Err(ConfigurationError::invalid(
                "quick_chip_percentages",
                pct,
                "chip percentages must be within 1..=100",
            ));
        }

        if let Some(amount) = self
            .quick_chip_amounts
            .iter()
            .find(|amount| **amount <= Decimal::ZERO)
        {
            return Err(ConfigurationError::invalid(
                "quick_chip_amounts",
                amount,
                "chip amounts must be > 0",
            ));
        }

        Ok(())
    }

    /// Session length as a chrono duration
    pub fn session_duration(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.session_duration_ms as i64)
    }
}

/// Configuration loader with environment variable support
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and `MOOLA_*` environment variables
    pub fn load(&self) -> EngineResult<GameConfig> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as [`ConfigLoader::load`] with an explicit variable lookup
    pub fn load_with<F>(&self, lookup: F) -> EngineResult<GameConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match self.config_path {
            Some(ref path) => self.load_from_file(path)?,
            None => GameConfig::default(),
        };

        apply_overrides(&mut config, lookup)?;
        config.validate()?;

        tracing::debug!(
            "Loaded game config: balance {} -> {}, bias {}",
            config.initial_balance,
            config.target_balance,
            config.side_a_bias
        );

        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> EngineResult<GameConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e))
        })?;

        toml::from_str(&content).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into()
        })
    }

    /// Save configuration to file
    pub fn save(&self, config: &GameConfig, path: &str) -> EngineResult<()> {
        let toml_string = toml::to_string_pretty(config).map_err(|e| {
            ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, toml_string).map_err(|e| {
            ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into()
        })
    }
}

fn apply_overrides<F>(config: &mut GameConfig, lookup: F) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    fn parse<T: std::str::FromStr>(
        key: &str,
        raw: String,
        reason: &str,
    ) -> Result<T, ConfigurationError> {
        raw.trim()
            .parse()
            .map_err(|_| ConfigurationError::invalid(key, &raw, reason))
    }

    if let Some(raw) = lookup("MOOLA_INITIAL_BALANCE") {
        config.initial_balance = parse("MOOLA_INITIAL_BALANCE", raw, "Invalid amount")?;
    }
    if let Some(raw) = lookup("MOOLA_TARGET_BALANCE") {
        config.target_balance = parse("MOOLA_TARGET_BALANCE", raw, "Invalid amount")?;
    }
    if let Some(raw) = lookup("MOOLA_MIN_WAGER") {
        config.min_wager = parse("MOOLA_MIN_WAGER", raw, "Invalid amount")?;
    }
    if let Some(raw) = lookup("MOOLA_SIDE_A_BIAS") {
        config.side_a_bias = parse("MOOLA_SIDE_A_BIAS", raw, "Invalid probability")?;
    }
    if let Some(raw) = lookup("MOOLA_SESSION_DURATION_MS") {
        config.session_duration_ms = parse("MOOLA_SESSION_DURATION_MS", raw, "Invalid duration")?;
    }

    Ok(())
}

/// Builder pattern for creating configurations
pub struct ConfigBuilder {
    config: GameConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GameConfig::default(),
        }
    }

    pub fn initial_balance(mut self, amount: Money) -> Self {
        self.config.initial_balance = amount;
        self
    }

    pub fn target_balance(mut self, amount: Money) -> Self {
        self.config.target_balance = amount;
        self
    }

    pub fn min_wager(mut self, amount: Money) -> Self {
        self.config.min_wager = amount;
        self
    }

    pub fn side_a_bias(mut self, bias: f64) -> Self {
        self.config.side_a_bias = bias;
        self
    }

    pub fn session_duration_ms(mut self, duration_ms: u64) -> Self {
        self.config.session_duration_ms = duration_ms;
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<GameConfig, ConfigurationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config(path: &str) -> EngineResult<()> {
    ConfigLoader::new().save(&GameConfig::default(), path)
}
