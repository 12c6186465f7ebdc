//! Configuration loader. A single JSON file selects the bcrypt work factor and
//! the default log filter for the CLI.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::crypto::passwords::{TruncatingBcryptEncoder, DEFAULT_COST};

/// Smallest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Largest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("bcrypt cost {0} outside 4..=31")]
    InvalidCost(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BcryptConfig {
    #[serde(default = "default_cost")]
    pub cost: u32,
}

fn default_cost() -> u32 {
    DEFAULT_COST
}

impl Default for BcryptConfig {
    fn default() -> Self {
        Self {
            cost: DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EncoderConfig {
    #[serde(default)]
    pub bcrypt: BcryptConfig,
    #[serde(rename = "debugLevel")]
    pub debug_level: Option<String>,
}

impl EncoderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_COST..=MAX_COST).contains(&self.bcrypt.cost) {
            return Err(ConfigError::InvalidCost(self.bcrypt.cost));
        }
        Ok(())
    }

    pub fn build_encoder(&self) -> TruncatingBcryptEncoder {
        TruncatingBcryptEncoder::with_cost(self.bcrypt.cost)
    }
}

/// Parses configuration from a JSON string and validates it.
pub fn parse_config(raw_json: &str) -> Result<EncoderConfig, ConfigError> {
    let config: EncoderConfig =
        serde_json::from_str(raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;
    config.validate()?;
    Ok(config)
}

/// Loads and validates the JSON configuration file at `path`.
pub fn load_config(path: impl AsRef<Path>) -> Result<EncoderConfig, ConfigError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    parse_config(&raw_json)
}
