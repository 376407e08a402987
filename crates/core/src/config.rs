//! Configuration module - board geometry and spawn tuning
//!
//! The game reads an optional JSON file. Any field left out keeps its default, at
//! every nesting level, so a file containing only `{"gridHeight": 16}` is valid.
//! Loading never has to succeed: [`GameConfig::load_or_default`] logs the problem
//! and falls back to [`GameConfig::default`].
//!
//! ```
//! use drop_merge_core::GameConfig;
//!
//! let config = GameConfig::from_json(r#"{"spawnWeights": {"base2": 60}}"#).unwrap();
//! assert_eq!(config.spawn_weights.base2, 60.0);
//! assert_eq!(config.spawn_weights.base4, 40.0);
//! assert_eq!(config.grid_height, 12);
//! ```

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::BoardGeometry;
use crate::types::{DEFAULT_VISIBLE_HEIGHT, MAX_VISIBLE_HEIGHT, TILE_SIZE};

/// Environment variable naming the config file used by [`GameConfig::from_env`]
pub const CONFIG_ENV_VAR: &str = "DROP_MERGE_CONFIG";

/// Errors raised while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for this schema
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside the accepted range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Spawn weight schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpawnWeights {
    /// Weight of exponent 1 (value 2)
    pub base2: f64,
    /// Weight of exponent 2 (value 4)
    pub base4: f64,
    /// Decay applied per tier above exponent 2
    pub tier_multiplier: f64,
    /// Floor for every decayed tier weight
    pub min_weight: f64,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            base2: 45.0,
            base4: 40.0,
            tier_multiplier: 0.5,
            min_weight: 5.0,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Visible grid height in cells
    pub grid_height: u8,
    pub spawn_weights: SpawnWeights,
    /// How many tiers below the highest unlocked exponent stay spawnable
    pub tier_window_size: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_height: DEFAULT_VISIBLE_HEIGHT,
            spawn_weights: SpawnWeights::default(),
            tier_window_size: 6,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Load a file, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("Failed to load config {}, using defaults: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Load the file named by `DROP_MERGE_CONFIG`, or defaults when unset
    pub fn from_env() -> Self {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load_or_default(path.trim()),
            _ => Self::default(),
        }
    }

    /// Check every value is usable by the board and spawner
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_height < TILE_SIZE || self.grid_height > MAX_VISIBLE_HEIGHT {
            return Err(ConfigError::Invalid {
                field: "gridHeight",
                reason: format!(
                    "must be between {} and {}, got {}",
                    TILE_SIZE, MAX_VISIBLE_HEIGHT, self.grid_height
                ),
            });
        }
        if self.grid_height % TILE_SIZE != 0 {
            return Err(ConfigError::Invalid {
                field: "gridHeight",
                reason: format!("must be a multiple of {}, got {}", TILE_SIZE, self.grid_height),
            });
        }
        if self.tier_window_size == 0 {
            return Err(ConfigError::Invalid {
                field: "tierWindowSize",
                reason: "must be at least 1".to_string(),
            });
        }

        let w = &self.spawn_weights;
        for (field, value) in [
            ("spawnWeights.base2", w.base2),
            ("spawnWeights.base4", w.base4),
            ("spawnWeights.tierMultiplier", w.tier_multiplier),
            ("spawnWeights.minWeight", w.min_weight),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }
        Ok(())
    }

    pub fn board_geometry(&self) -> BoardGeometry {
        BoardGeometry {
            visible_height: self.grid_height,
        }
    }
}
