pub mod types;
pub mod events;
pub mod state;
pub mod demo;

pub mod entities;
pub mod grid;
pub mod systems;

pub use events::GameEvent;
pub use state::{GameSession, GameSnapshot};
pub use types::*;
