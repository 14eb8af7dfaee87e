//! Shift resolution system.
//!
//! A shift runs in two steps so the caller can animate in between:
//! [`resolve_shift`] slides every block and records merges in a
//! [`ResolutionPlan`], then [`apply_merge_completions`] replaces each merged
//! pair with one doubled block.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::game::entities::BlockRegistry;
use crate::game::grid::Grid;
use crate::game::types::{BlockId, Direction, Position};

/// Where one block ends up after a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMove {
    pub block: BlockId,
    pub value: u32,
    pub from: Position,
    /// Resting position: the block's own slot, or its merge target's slot.
    pub to: Position,
    pub merge_target: Option<BlockId>,
}

impl BlockMove {
    pub fn changed(&self) -> bool {
        self.from != self.to || self.merge_target.is_some()
    }
}

/// A merge waiting to be completed once the movement has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMerge {
    pub moving: BlockId,
    pub target: BlockId,
    pub position: Position,
    /// Value of the block that replaces the pair.
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPlan {
    /// Sequence number of the move this plan belongs to, stamped by the session.
    pub move_id: u64,
    pub direction: Direction,
    /// True if any block changed slot or acquired a merge target.
    pub valid: bool,
    /// One entry per block, in processing order.
    pub moves: Vec<BlockMove>,
    pub merges: Vec<PendingMerge>,
}

/// Slide every block as far as it goes towards `direction`.
///
/// Blocks nearest the leading edge are processed first so no block passes
/// one that has not settled yet. Each block merges at most once, and a block
/// that has been merged into cannot be merged into again in the same pass.
pub fn resolve_shift(
    grid: &mut Grid,
    blocks: &mut BlockRegistry,
    direction: Direction,
) -> Result<ResolutionPlan, GameError> {
    let mut order: Vec<(Position, BlockId)> = blocks
        .iter()
        .map(|b| (grid.position(b.slot), b.id))
        .collect();
    order.sort_by_key(|(pos, _)| (pos.x, pos.y));
    if direction.leads_from_high_end() {
        order.reverse();
    }

    let mut valid = false;
    let mut moves = Vec::with_capacity(order.len());
    let mut merges = Vec::new();

    for (from, id) in order {
        let value = blocks.get(id).ok_or(GameError::UnknownBlock(id))?.value;
        let mut merge_target = None;

        loop {
            let current = blocks.get(id).ok_or(GameError::UnknownBlock(id))?.slot;
            let Some(next) = grid.neighbor(current, direction) else {
                break;
            };
            match grid.occupant(next) {
                Some(target) if blocks.can_merge_with(target, value) => {
                    let doubled = value.checked_mul(2).ok_or(GameError::InvalidValue(value))?;
                    blocks.begin_merge(grid, id, target)?;
                    merge_target = Some((target, grid.position(next), doubled));
                    valid = true;
                    break;
                }
                None => {
                    blocks.assign_to(grid, id, next)?;
                    valid = true;
                }
                Some(_) => break,
            }
        }

        let rest = grid.position(blocks.get(id).ok_or(GameError::UnknownBlock(id))?.slot);
        let to = match merge_target {
            Some((target, position, doubled)) => {
                merges.push(PendingMerge {
                    moving: id,
                    target,
                    position,
                    value: doubled,
                });
                position
            }
            None => rest,
        };
        moves.push(BlockMove {
            block: id,
            value,
            from,
            to,
            merge_target: merge_target.map(|(target, _, _)| target),
        });
    }

    debug!(
        "[Shift] {:?}: valid={} moved={} merges={}",
        direction,
        valid,
        moves.iter().filter(|m| m.changed()).count(),
        merges.len()
    );

    Ok(ResolutionPlan {
        move_id: 0,
        direction,
        valid,
        moves,
        merges,
    })
}

/// Replace every merged pair in `plan` with one doubled block on the
/// target's slot. Returns the ids of the new blocks in plan order.
///
/// All referenced blocks are checked before anything is touched, so a plan
/// that does not match the registry leaves it unchanged.
pub fn apply_merge_completions(
    grid: &mut Grid,
    blocks: &mut BlockRegistry,
    plan: &ResolutionPlan,
) -> Result<Vec<BlockId>, GameError> {
    for merge in &plan.merges {
        for id in [merge.moving, merge.target] {
            if !blocks.contains(id) {
                return Err(GameError::UnknownBlock(id));
            }
        }
    }

    let mut created = Vec::with_capacity(plan.merges.len());
    for merge in &plan.merges {
        let slot = blocks
            .get(merge.target)
            .ok_or(GameError::UnknownBlock(merge.target))?
            .slot;
        blocks.remove(grid, merge.moving)?;
        blocks.remove(grid, merge.target)?;
        let id = blocks.create(grid, slot, merge.value)?;
        debug!("[Shift] Merged {} + {} -> {} = {}", merge.moving, merge.target, id, merge.value);
        created.push(id);
    }
    Ok(created)
}
