//! Deterministic engine for a 2048-style merge puzzle.
//!
//! The crate covers the board and nothing that draws it: a [`game::grid::Grid`]
//! of slots, a [`game::entities::BlockRegistry`] owning the blocks, a random
//! spawner, the shift/merge resolver and a [`GameSession`] state machine that
//! ties them together. A presentation layer pushes directions into the
//! session and reads back plans, snapshots and events.
//!
//! ```
//! use merge_grid::{BoardConfig, Direction, GamePhase, GameSession};
//!
//! let mut session = GameSession::seeded(BoardConfig::default(), 42).unwrap();
//! assert_eq!(session.phase(), GamePhase::WaitingInput);
//! assert_eq!(session.blocks().len(), 2);
//!
//! if let Some(plan) = session.submit_direction(Direction::Left).unwrap() {
//!     // Animate `plan.moves` here, then finish the move.
//!     session.apply_merge_completions(&plan).unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod game;


pub use config::{BlockCatalog, BlockType, BoardConfig, SpawnWeight};
pub use error::{ConfigError, GameError};
pub use game::systems::{BlockMove, PendingMerge, ResolutionPlan};
pub use game::{BlockId, BlockView, Direction, GameEvent, GamePhase, GameSession, GameSnapshot, Position};
