//! Error types for the engine and its configuration.
//!
//! Precondition violations surface as [`GameError`]; nothing is partially
//! applied when one is returned. No-op situations (input outside
//! `WaitingInput`, a shift that moves nothing) are not errors.

use std::path::PathBuf;

use crate::game::types::{BlockId, Position};

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("position ({}, {}) is outside the {width}x{height} board", .position.x, .position.y)]
    OutOfBounds {
        position: Position,
        width: usize,
        height: usize,
    },
    #[error("slot ({}, {}) is already occupied by block {occupant}", .position.x, .position.y)]
    SlotOccupied { position: Position, occupant: BlockId },
    #[error("block {0} does not exist")]
    UnknownBlock(BlockId),
    #[error("block value {0} is not a power of two >= 2")]
    InvalidValue(u32),
    #[error("merge completions can only be applied while moving")]
    NotMoving,
    #[error("plan for move {plan} does not match the outstanding move {expected}")]
    StalePlan { plan: u64, expected: u64 },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("board dimensions must be non-zero, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[error("win value {0} must be a power of two >= 4")]
    InvalidWinValue(u32),
    #[error("spawn table is empty")]
    EmptySpawnTable,
    #[error("spawn value {0} is not a power of two >= 2")]
    InvalidSpawnValue(u32),
    #[error("spawn probability {probability} for value {value} is invalid")]
    InvalidProbability { value: u32, probability: f64 },
    #[error("initial spawn count must be at least 1")]
    ZeroInitialSpawn,
}
