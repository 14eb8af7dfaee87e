/// Game configuration constants.
///
/// This module defines the default gameplay parameters such as grid dimensions,
/// the winning value and the spawn probabilities.

/// Number of columns in the game grid.
pub const GRID_WIDTH: usize = 4;

/// Number of rows in the game grid.
pub const GRID_HEIGHT: usize = 4;

/// Value a block must reach for the game to be won.
pub const WIN_VALUE: u32 = 2048;

/// Blocks spawned on the first spawn phase of a level.
pub const INITIAL_SPAWN_COUNT: usize = 2;

/// Blocks spawned after every valid move.
pub const TURN_SPAWN_COUNT: usize = 1;

/// Default spawn table as (value, probability) pairs.
pub const SPAWN_TABLE: [(u32, f64); 2] = [(2, 0.8), (4, 0.2)];

/// Default display attributes as (value, hex color) pairs.
pub const BLOCK_COLORS: [(u32, &str); 11] = [
    (2, "#eee4da"),
    (4, "#ede0c8"),
    (8, "#f2b179"),
    (16, "#f59563"),
    (32, "#f67c5f"),
    (64, "#f65e3b"),
    (128, "#edcf72"),
    (256, "#edcc61"),
    (512, "#edc850"),
    (1024, "#edc53f"),
    (2048, "#edc22e"),
];

/// Color used for values missing from the catalog.
pub const FALLBACK_COLOR: &str = "#3c3a32";
