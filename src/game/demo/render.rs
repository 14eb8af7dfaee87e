//! Game rendering system (terminal).
//!
//! Turns a session snapshot into plain text for debugging and the demo.

use crate::config::BlockCatalog;
use crate::game::state::GameSnapshot;
use crate::game::types::Position;

/// Render the board, top row first (largest `y`).
pub fn render_board(snapshot: &GameSnapshot, catalog: &BlockCatalog) -> String {
    let cell_width = snapshot
        .blocks
        .iter()
        .map(|b| catalog.lookup(b.value).label.len())
        .max()
        .unwrap_or(1)
        .max(4);

    let mut out = String::new();
    for y in (0..snapshot.height).rev() {
        for x in 0..snapshot.width {
            let position = Position::new(x, y);
            let label = match snapshot.blocks.iter().find(|b| b.position == position) {
                Some(block) => catalog.lookup(block.value).label,
                None => ".".to_string(),
            };
            out.push_str(&format!("{:>width$} ", label, width = cell_width));
        }
        out.push('\n');
    }
    out
}

/// One-line status: phase, move count and score.
pub fn render_status(snapshot: &GameSnapshot) -> String {
    format!(
        "--- {:?} | moves: {} | score: {} ---",
        snapshot.phase, snapshot.moves, snapshot.score
    )
}
