//! Configuration management for Kinship.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Genesis lifecycle as a multiple of `min_lifetime` when none is configured.
///
/// Lifecycles halve each generation down to `min_lifetime`, so with the
/// default factor the fourth generation already lives `min_lifetime` steps.
pub const GENESIS_LIFETIME_FACTOR: u64 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub natural_law: NaturalLawConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters of the birth rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalLawConfig {
    /// Minimum account lifetime, in time-proof sequence steps
    pub min_lifetime: u64,
    /// Lifecycle of the two genesis accounts; unset means
    /// `min_lifetime * GENESIS_LIFETIME_FACTOR`
    #[serde(default)]
    pub genesis_lifetime: Option<u64>,
}

impl NaturalLawConfig {
    /// A parent must be at least this old, and must wait at least this long
    /// between two co-signed births.
    pub fn quarter_lifetime(&self) -> u64 {
        self.min_lifetime / 4
    }

    pub fn genesis_lifecycle(&self) -> u64 {
        self.genesis_lifetime
            .unwrap_or_else(|| self.min_lifetime.saturating_mul(GENESIS_LIFETIME_FACTOR))
    }

    /// Reject parameter sets under which the age and co-sign windows vanish.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quarter_lifetime() == 0 {
            return Err(ConfigError::LifetimeTooShort(self.min_lifetime));
        }
        if let Some(genesis) = self.genesis_lifetime {
            if genesis < self.min_lifetime {
                return Err(ConfigError::GenesisBelowMinimum {
                    genesis,
                    min_lifetime: self.min_lifetime,
                });
            }
        }
        Ok(())
    }
}

impl Default for NaturalLawConfig {
    fn default() -> Self {
        Self {
            min_lifetime: 1024,
            genesis_lifetime: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            natural_law: NaturalLawConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Reject parameter sets under which the birth rules degenerate.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.natural_law.validate()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
