//! Game entities module.
//!
//! This module organizes block entity logic and block spawning.

pub mod block;
pub mod spawner;

pub use block::*;
pub use spawner::*;
