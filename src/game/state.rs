//! Game session state machine.
//!
//! A [`GameSession`] owns one board and walks it through
//! `GenerateLevel -> SpawningBlocks -> WaitingInput -> Moving -> ...`
//! until it reaches `Win` or `Lose`. Moves are split in two calls
//! ([`GameSession::submit_direction`] and
//! [`GameSession::apply_merge_completions`]) so a caller can animate between
//! them; [`GameSession::step`] does both at once.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use crate::config::BoardConfig;
use crate::error::GameError;
use crate::game::entities::{spawn_blocks, BlockRegistry};
use crate::game::events::GameEvent;
use crate::game::grid::Grid;
use crate::game::systems::{apply_merge_completions, has_won, is_stuck, resolve_shift, ResolutionPlan};
use crate::game::types::{BlockView, Direction, GamePhase, Position};

/// Serializable picture of a session for drawing or logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub id: Uuid,
    pub phase: GamePhase,
    pub width: usize,
    pub height: usize,
    pub round: u32,
    pub moves: u64,
    pub score: u64,
    pub blocks: Vec<BlockView>,
}

#[derive(Debug)]
pub struct GameSession<R: Rng = StdRng> {
    id: Uuid,
    config: BoardConfig,
    grid: Grid,
    blocks: BlockRegistry,
    phase: GamePhase,
    rng: R,
    /// Spawn phases that actually spawned.
    round: u32,
    /// Valid moves completed.
    moves: u64,
    /// Sequence number of the last submitted move.
    move_seq: u64,
    /// Move waiting for its merge completions.
    pending_move: Option<u64>,
    last_move_valid: bool,
    score: u64,
    events: Vec<GameEvent>,
}

impl GameSession<StdRng> {
    /// Start a session seeded from the operating system.
    pub fn new(config: BoardConfig) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Start a session with a fixed seed, for replays and tests.
    pub fn seeded(config: BoardConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameSession<R> {
    /// Validate `config`, build the level and run the first spawn phase.
    pub fn with_rng(config: BoardConfig, rng: R) -> Result<Self, GameError> {
        let mut session = Self::blank(config, rng)?;
        session.change_phase(GamePhase::GenerateLevel)?;
        Ok(session)
    }

    /// Start from a given layout, as if a valid move had just finished: the
    /// next spawn phase places the per-turn amount and checks win/lose.
    pub fn from_blocks(config: BoardConfig, rng: R, layout: &[(Position, u32)]) -> Result<Self, GameError> {
        let mut session = Self::blank(config, rng)?;
        for &(position, value) in layout {
            let slot = session.grid.require_slot(position)?;
            let block = session.blocks.create(&mut session.grid, slot, value)?;
            session.events.push(GameEvent::Spawned { block, value, position });
        }
        session.round = 1;
        session.last_move_valid = true;
        session.change_phase(GamePhase::SpawningBlocks)?;
        Ok(session)
    }

    fn blank(config: BoardConfig, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);
        Ok(GameSession {
            id: Uuid::new_v4(),
            config,
            grid,
            blocks: BlockRegistry::new(),
            phase: GamePhase::GenerateLevel,
            rng,
            round: 0,
            moves: 0,
            move_seq: 0,
            pending_move: None,
            last_move_valid: true,
            score: 0,
            events: Vec::new(),
        })
    }

    /// Throw the board away and start a new level.
    pub fn restart(&mut self) -> Result<GamePhase, GameError> {
        info!("[GameSession] Restart: game_id={}", self.id);
        self.change_phase(GamePhase::GenerateLevel)?;
        Ok(self.phase)
    }

    /// Push a direction. Outside `WaitingInput` this is a no-op and returns
    /// `None`. Otherwise the session moves to `Moving` and returns the plan,
    /// which must be handed back to [`GameSession::apply_merge_completions`].
    ///
    /// The shift is resolved on a copy of the board. If it fails, the session
    /// stays in `WaitingInput` with the board untouched.
    pub fn submit_direction(&mut self, direction: Direction) -> Result<Option<ResolutionPlan>, GameError> {
        if self.phase != GamePhase::WaitingInput {
            debug!(
                "[GameSession] Ignored {:?} in phase {:?}: game_id={}",
                direction, self.phase, self.id
            );
            return Ok(None);
        }

        let mut grid = self.grid.clone();
        let mut blocks = self.blocks.clone();
        let mut plan = resolve_shift(&mut grid, &mut blocks, direction)?;
        self.grid = grid;
        self.blocks = blocks;
        self.change_phase(GamePhase::Moving)?;

        self.move_seq += 1;
        plan.move_id = self.move_seq;
        self.pending_move = Some(plan.move_id);
        self.last_move_valid = plan.valid;

        for step in plan.moves.iter().filter(|m| m.changed()) {
            self.events.push(GameEvent::Moved {
                block: step.block,
                from: step.from,
                to: step.to,
            });
        }
        Ok(Some(plan))
    }

    /// Finish the outstanding move: merge the recorded pairs, then run the
    /// spawn phase. Returns the phase the session settled in.
    pub fn apply_merge_completions(&mut self, plan: &ResolutionPlan) -> Result<GamePhase, GameError> {
        if self.phase != GamePhase::Moving {
            return Err(GameError::NotMoving);
        }
        let expected = self.pending_move.unwrap_or_default();
        if plan.move_id != expected {
            return Err(GameError::StalePlan {
                plan: plan.move_id,
                expected,
            });
        }

        let created = apply_merge_completions(&mut self.grid, &mut self.blocks, plan)?;
        for (merge, result) in plan.merges.iter().zip(created) {
            self.score += u64::from(merge.value);
            self.events.push(GameEvent::Merged {
                moving: merge.moving,
                target: merge.target,
                result,
                value: merge.value,
                position: merge.position,
            });
        }
        self.pending_move = None;
        if plan.valid {
            self.moves += 1;
        }

        self.change_phase(GamePhase::SpawningBlocks)?;
        Ok(self.phase)
    }

    /// Submit and complete a move in one call, for callers that do not animate.
    pub fn step(&mut self, direction: Direction) -> Result<Option<ResolutionPlan>, GameError> {
        let Some(plan) = self.submit_direction(direction)? else {
            return Ok(None);
        };
        self.apply_merge_completions(&plan)?;
        Ok(Some(plan))
    }

    /// Enter `phase` and keep following automatic transitions until the
    /// session waits for input or ends.
    fn change_phase(&mut self, phase: GamePhase) -> Result<(), GameError> {
        let mut next = Some(phase);
        while let Some(phase) = next.take() {
            self.set_phase(phase);
            next = match phase {
                GamePhase::GenerateLevel => {
                    self.generate_level();
                    Some(GamePhase::SpawningBlocks)
                }
                GamePhase::SpawningBlocks => Some(self.spawn_phase()?),
                GamePhase::WaitingInput | GamePhase::Moving => None,
                GamePhase::Win | GamePhase::Lose => {
                    info!(
                        "[GameSession] Game over ({:?}): game_id={} moves={} score={}",
                        phase, self.id, self.moves, self.score
                    );
                    None
                }
            };
        }
        Ok(())
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            debug!("[GameSession] {:?} -> {:?}: game_id={}", self.phase, phase, self.id);
            self.events.push(GameEvent::PhaseChanged { from: self.phase, to: phase });
        }
        self.phase = phase;
    }

    fn generate_level(&mut self) {
        self.grid = Grid::new(self.config.width, self.config.height);
        self.blocks.clear();
        self.round = 0;
        self.moves = 0;
        self.score = 0;
        self.pending_move = None;
        self.last_move_valid = true;
    }

    /// Spawn phase body; returns the phase to continue with.
    fn spawn_phase(&mut self) -> Result<GamePhase, GameError> {
        if self.round > 0 && !self.last_move_valid {
            return Ok(GamePhase::WaitingInput);
        }

        let amount = if self.round == 0 {
            self.config.initial_spawn
        } else {
            self.config.turn_spawn
        };
        self.round += 1;

        let report = spawn_blocks(
            &mut self.grid,
            &mut self.blocks,
            &self.config.spawn_table,
            amount,
            &mut self.rng,
        )?;
        for &block in &report.spawned {
            if let Some(b) = self.blocks.get(block) {
                self.events.push(GameEvent::Spawned {
                    block,
                    value: b.value,
                    position: self.grid.position(b.slot),
                });
            }
        }

        if has_won(&self.blocks, self.config.win_value) {
            return Ok(GamePhase::Win);
        }
        if is_stuck(&self.grid, &self.blocks) {
            debug!(
                "[GameSession] Board stuck after spawn: free_before={} game_id={}",
                report.free_before, self.id
            );
            return Ok(GamePhase::Lose);
        }
        Ok(GamePhase::WaitingInput)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Sum of the values produced by merges.
    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.blocks
    }

    pub fn blocks(&self) -> Vec<BlockView> {
        self.blocks.views(&self.grid)
    }

    /// Value of the block at `position`, if any. Out-of-bounds is an error.
    pub fn value_at(&self, position: Position) -> Result<Option<u32>, GameError> {
        let occupant = self.grid.occupant_at(position)?;
        Ok(occupant.and_then(|id| self.blocks.get(id)).map(|b| b.value))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id,
            phase: self.phase,
            width: self.grid.width(),
            height: self.grid.height(),
            round: self.round,
            moves: self.moves,
            score: self.score,
            blocks: self.blocks(),
        }
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
