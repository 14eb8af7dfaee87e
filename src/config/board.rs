//! Runtime board configuration.
//!
//! A [`BoardConfig`] is loaded once per session (from defaults or JSON) and
//! validated before any grid is built. None of it changes during play.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::game::{
    BLOCK_COLORS, FALLBACK_COLOR, GRID_HEIGHT, GRID_WIDTH, INITIAL_SPAWN_COUNT, SPAWN_TABLE,
    TURN_SPAWN_COUNT, WIN_VALUE,
};
use crate::error::ConfigError;
use crate::game::types::is_block_value;

/// One entry of the spawn table: a value and the chance it is picked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeight {
    pub value: u32,
    pub probability: f64,
}

/// Display attributes for one block value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockType {
    pub value: u32,
    pub color: String,
    pub label: String,
}

impl BlockType {
    pub fn new(value: u32, color: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
            label: value.to_string(),
        }
    }
}

/// Value -> display attributes mapping, read-only after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockCatalog {
    types: Vec<BlockType>,
}

impl BlockCatalog {
    pub fn new(types: Vec<BlockType>) -> Self {
        Self { types }
    }

    /// Display attributes for `value`. Values the catalog does not list get
    /// their decimal label and the fallback color.
    pub fn lookup(&self, value: u32) -> BlockType {
        self.types
            .iter()
            .find(|t| t.value == value)
            .cloned()
            .unwrap_or_else(|| BlockType::new(value, FALLBACK_COLOR))
    }

    pub fn contains(&self, value: u32) -> bool {
        self.types.iter().any(|t| t.value == value)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::new(
            BLOCK_COLORS
                .iter()
                .map(|&(value, color)| BlockType::new(value, color))
                .collect(),
        )
    }
}

/// Parameters of one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
    pub win_value: u32,
    pub spawn_table: Vec<SpawnWeight>,
    pub initial_spawn: usize,
    pub turn_spawn: usize,
    pub catalog: BlockCatalog,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            win_value: WIN_VALUE,
            spawn_table: SPAWN_TABLE
                .iter()
                .map(|&(value, probability)| SpawnWeight { value, probability })
                .collect(),
            initial_spawn: INITIAL_SPAWN_COUNT,
            turn_spawn: TURN_SPAWN_COUNT,
            catalog: BlockCatalog::default(),
        }
    }
}

impl BoardConfig {
    /// Default configuration with different board dimensions.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        debug!(
            "[Config] Loaded {:?}: {}x{} win={}",
            path, config.width, config.height, config.win_value
        );
        Ok(config)
    }

    /// Check every parameter the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.width,
                height: self.height,
            });
        }
        if self.win_value < 4 || !self.win_value.is_power_of_two() {
            return Err(ConfigError::InvalidWinValue(self.win_value));
        }
        if self.spawn_table.is_empty() {
            return Err(ConfigError::EmptySpawnTable);
        }
        for weight in &self.spawn_table {
            if !is_block_value(weight.value) {
                return Err(ConfigError::InvalidSpawnValue(weight.value));
            }
            if !weight.probability.is_finite() || !(0.0..=1.0).contains(&weight.probability) {
                return Err(ConfigError::InvalidProbability {
                    value: weight.value,
                    probability: weight.probability,
                });
            }
        }
        let total: f64 = self.spawn_table.iter().map(|w| w.probability).sum();
        if total <= 0.0 {
            // Report the first entry; all of them are zero.
            let first = self.spawn_table[0];
            return Err(ConfigError::InvalidProbability {
                value: first.value,
                probability: first.probability,
            });
        }
        if self.initial_spawn == 0 {
            return Err(ConfigError::ZeroInitialSpawn);
        }
        Ok(())
    }

    /// Total number of slots on the board.
    pub fn slot_count(&self) -> usize {
        self.width * self.height
    }
}
