//! Run configuration.
//!
//! Every section defaults to the constants the reference data sets were built
//! with, so a JSON file only needs to name the values it changes:
//!
//! ```json
//! { "sequence": { "frame_count": 20, "selection": { "fixed": "left" } } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bank::BankConfig;
use crate::error::{IoContext, Result};
use crate::sensor::SensorConfig;
use crate::sequence::SequenceConfig;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Background image bank.
    pub bank: BankConfig,
    /// Frame sequence generation.
    pub sequence: SequenceConfig,
    /// Sensor trace generation.
    pub sensor: SensorConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).at(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
