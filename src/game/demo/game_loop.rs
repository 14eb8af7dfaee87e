//! Standalone game loop for local play in a terminal.
//!
//! Reads one command per line: arrow keys (as escape sequences), `wasd`,
//! `r` to restart and `q` to quit.

use std::error::Error;
use std::io::{BufRead, Write};

use log::{info, warn};
use rand::Rng;

use crate::game::demo::render::{render_board, render_status};
use crate::game::state::GameSession;
use crate::game::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Shift(Direction),
    Restart,
    Quit,
}

/// Map one input line to a command.
pub fn parse_command(input: &str) -> Option<Command> {
    match input.trim() {
        "\x1b[D" | "a" | "h" | "left" => Some(Command::Shift(Direction::Left)),
        "\x1b[C" | "d" | "l" | "right" => Some(Command::Shift(Direction::Right)),
        "\x1b[A" | "w" | "k" | "up" => Some(Command::Shift(Direction::Up)),
        "\x1b[B" | "s" | "j" | "down" => Some(Command::Shift(Direction::Down)),
        "r" | "restart" => Some(Command::Restart),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

/// Run the interactive loop until the game ends, the player quits or input
/// runs out.
pub fn run_game_loop<R: Rng>(
    session: &mut GameSession<R>,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<(), Box<dyn Error>> {
    draw(session, &mut output)?;
    let mut lines = input.lines();

    while !session.is_over() {
        write!(output, "Enter direction (← ↑ ↓ → or wasd, r restart, q quit), then press Enter: ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match parse_command(&line?) {
            Some(Command::Shift(direction)) => {
                if let Some(plan) = session.step(direction)? {
                    if !plan.valid {
                        writeln!(output, "Nothing moves that way.")?;
                    }
                }
            }
            Some(Command::Restart) => {
                session.restart()?;
            }
            Some(Command::Quit) => {
                info!("[Demo] Player quit: game_id={}", session.id());
                return Ok(());
            }
            None => {
                warn!("[Demo] Unrecognised input");
                continue;
            }
        }
        session.drain_events();
        draw(session, &mut output)?;
    }

    if session.is_over() {
        writeln!(output, "Game over: {:?} with score {}", session.phase(), session.score())?;
    }
    Ok(())
}

fn draw<R: Rng>(session: &GameSession<R>, output: &mut impl Write) -> std::io::Result<()> {
    let snapshot = session.snapshot();
    writeln!(output, "{}", render_status(&snapshot))?;
    writeln!(output, "{}", render_board(&snapshot, &session.config().catalog))
}
