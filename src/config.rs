//! Tunables for driving a date-picker, loadable from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    ContiguityCheck, DEFAULT_MAX_ITERATIONS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SETTLE_TIMEOUT_MS,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid picker configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid picker configuration: {0}")]
    Invalid(String),
}

/// ```toml
/// max_iterations = 24
/// settle_timeout_ms = 1500
/// poll_interval_ms = 50
/// between_selections_ms = 500
/// contiguity = "strict"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PickerConfig {
    /// Month steps allowed before navigation gives up
    pub max_iterations: u32,
    /// Upper bound on waiting for the header to re-render after a click
    pub settle_timeout_ms: u64,
    /// Delay between header reads while waiting
    pub poll_interval_ms: u64,
    /// Pause between selecting check-in and check-out
    pub between_selections_ms: u64,
    /// How gaps inside a selected range are treated
    pub contiguity: ContiguityCheck,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            settle_timeout_ms: DEFAULT_SETTLE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            between_selections_ms: 0,
            contiguity: ContiguityCheck::default(),
        }
    }
}

impl PickerConfig {
    /// Parses and validates a TOML document; absent keys keep their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Toml` for malformed TOML or unknown keys, and
    /// `ConfigError::Invalid` when `poll_interval_ms` is zero.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `ConfigError::Invalid` when `poll_interval_ms` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be at least 1".to_owned()));
        }
        Ok(())
    }

    pub const fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub const fn between_selections(&self) -> Duration {
        Duration::from_millis(self.between_selections_ms)
    }
}
