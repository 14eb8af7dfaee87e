//! Terminal demo for the merge-grid engine.
//!
//! Usage: `merge-grid [config.json]`. Without a path the default 4x4 board is
//! used. Set `RUST_LOG=debug` to follow phase changes and merges.

use std::error::Error;
use std::io;

use log::info;
use merge_grid::game::demo::game_loop::run_game_loop;
use merge_grid::{BoardConfig, GameSession};

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger from environment variable.
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => BoardConfig::from_json_file(path)?,
        None => BoardConfig::default(),
    };

    let mut session = GameSession::new(config)?;
    info!(
        "[Demo] Game start: game_id={} board={}x{} win={}",
        session.id(),
        session.config().width,
        session.config().height,
        session.config().win_value
    );

    let stdin = io::stdin();
    run_game_loop(&mut session, stdin.lock(), io::stdout())
}
