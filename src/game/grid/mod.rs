//! Grid module.
//!
//! Slot layout and occupancy bookkeeping.

pub mod grid;

pub use grid::*;
