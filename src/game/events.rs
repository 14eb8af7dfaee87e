use serde::{Deserialize, Serialize};

use crate::game::types::{BlockId, GamePhase, Position};

/// Record of one state change, appended by the session in the order the
/// changes happen. A presentation layer drains these after each call instead
/// of diffing snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// A block appeared, either from the spawner or a seeded layout.
    Spawned { block: BlockId, value: u32, position: Position },
    /// A block changed slot or started merging; `to` is where it comes to rest.
    Moved { block: BlockId, from: Position, to: Position },
    /// Two blocks were replaced by `result`.
    Merged {
        moving: BlockId,
        target: BlockId,
        result: BlockId,
        value: u32,
        position: Position,
    },
}
