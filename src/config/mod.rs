/// Main configuration module.
///
/// Re-exports the default gameplay constants and the runtime board configuration.
pub mod game;
pub mod board;

pub use board::*;
