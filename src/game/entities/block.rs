//! Block entities and their registry.
//!
//! The registry owns every live block. Slots only refer to blocks by id, and
//! every occupancy change goes through the registry so both sides stay in sync.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::GameError;
use crate::game::grid::Grid;
use crate::game::types::{can_double, is_block_value, BlockId, BlockView, SlotId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub id: BlockId,
    pub value: u32,
    /// Current slot. For a block that has started merging this is the slot it
    /// left, which is no longer marked as occupied by it.
    pub slot: SlotId,
    /// Block this one is travelling into, set during a shift.
    pub merge_target: Option<BlockId>,
    /// Set on the passive side of a merge so it is not targeted twice.
    pub merging: bool,
}

impl Block {
    /// A block may absorb another of `value` only once per shift, and only
    /// if the doubled value still fits.
    pub fn can_merge_with(&self, value: u32) -> bool {
        self.value == value && !self.merging && self.merge_target.is_none() && can_double(value)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BlockRegistry {
    blocks: BTreeMap<BlockId, Block>,
    next_id: u64,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a block of `value` on a free `slot`.
    pub fn create(&mut self, grid: &mut Grid, slot: SlotId, value: u32) -> Result<BlockId, GameError> {
        if !is_block_value(value) {
            return Err(GameError::InvalidValue(value));
        }
        if let Some(occupant) = grid.occupant(slot) {
            return Err(GameError::SlotOccupied {
                position: grid.position(slot),
                occupant,
            });
        }

        let id = BlockId(self.next_id);
        self.next_id += 1;
        grid.set_occupant(slot, id);
        self.blocks.insert(
            id,
            Block {
                id,
                value,
                slot,
                merge_target: None,
                merging: false,
            },
        );
        Ok(id)
    }

    /// Move `block` onto `slot`, releasing the slot it held before.
    pub fn assign_to(&mut self, grid: &mut Grid, block: BlockId, slot: SlotId) -> Result<(), GameError> {
        let entry = self.blocks.get_mut(&block).ok_or(GameError::UnknownBlock(block))?;
        match grid.occupant(slot) {
            Some(occupant) if occupant != block => {
                return Err(GameError::SlotOccupied {
                    position: grid.position(slot),
                    occupant,
                });
            }
            _ => {}
        }
        grid.release(entry.slot, block);
        entry.slot = slot;
        grid.set_occupant(slot, block);
        Ok(())
    }

    /// Detach `block` from the registry and from its slot.
    pub fn remove(&mut self, grid: &mut Grid, block: BlockId) -> Result<Block, GameError> {
        let removed = self.blocks.remove(&block).ok_or(GameError::UnknownBlock(block))?;
        grid.release(removed.slot, block);
        Ok(removed)
    }

    /// Start merging `block` into `target`: record the target, lock the
    /// target against further merges and free the mover's slot.
    pub fn begin_merge(&mut self, grid: &mut Grid, block: BlockId, target: BlockId) -> Result<(), GameError> {
        if !self.blocks.contains_key(&target) {
            return Err(GameError::UnknownBlock(target));
        }
        let mover = self.blocks.get_mut(&block).ok_or(GameError::UnknownBlock(block))?;
        mover.merge_target = Some(target);
        grid.release(mover.slot, block);
        if let Some(base) = self.blocks.get_mut(&target) {
            base.merging = true;
        }
        Ok(())
    }

    /// Merge eligibility of `block` for an incoming block of `value`.
    /// Unknown ids are never eligible.
    pub fn can_merge_with(&self, block: BlockId, value: u32) -> bool {
        self.blocks
            .get(&block)
            .is_some_and(|b| b.can_merge_with(value))
    }

    pub fn get(&self, block: BlockId) -> Option<&Block> {
        self.blocks.get(&block)
    }

    pub fn contains(&self, block: BlockId) -> bool {
        self.blocks.contains_key(&block)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Live blocks in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks.keys().copied().collect()
    }

    pub fn contains_value(&self, value: u32) -> bool {
        self.blocks.values().any(|b| b.value == value)
    }

    pub fn max_value(&self) -> Option<u32> {
        self.blocks.values().map(|b| b.value).max()
    }

    /// Drawing data for every live block.
    pub fn views(&self, grid: &Grid) -> Vec<BlockView> {
        self.blocks
            .values()
            .map(|b| BlockView {
                id: b.id,
                value: b.value,
                position: grid.position(b.slot),
            })
            .collect()
    }

    /// Drop every block. Ids keep increasing across a reset.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Position;

    fn slot(grid: &Grid, x: usize, y: usize) -> SlotId {
        grid.slot_at(Position::new(x, y)).unwrap()
    }

    #[test]
    fn create_occupies_slot() {
        let mut grid = Grid::new(3, 3);
        let mut blocks = BlockRegistry::new();
        let s = slot(&grid, 1, 1);
        let id = blocks.create(&mut grid, s, 2).unwrap();
        assert_eq!(grid.occupant(s), Some(id));
        assert_eq!(blocks.get(id).unwrap().slot, s);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn create_on_occupied_slot_fails() {
        let mut grid = Grid::new(3, 3);
        let mut blocks = BlockRegistry::new();
        let s = slot(&grid, 0, 0);
        let first = blocks.create(&mut grid, s, 2).unwrap();
        let err = blocks.create(&mut grid, s, 4).unwrap_err();
        assert!(matches!(err, GameError::SlotOccupied { occupant, .. } if occupant == first));
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn create_rejects_non_power_of_two() {
        let mut grid = Grid::new(3, 3);
        let mut blocks = BlockRegistry::new();
        let s = slot(&grid, 0, 0);
        assert!(matches!(blocks.create(&mut grid, s, 6), Err(GameError::InvalidValue(6))));
        assert!(matches!(blocks.create(&mut grid, s, 1), Err(GameError::InvalidValue(1))));
        assert!(!grid.is_occupied(s));
    }

    #[test]
    fn assign_to_keeps_both_sides_consistent() {
        let mut grid = Grid::new(3, 1);
        let mut blocks = BlockRegistry::new();
        let a = slot(&grid, 0, 0);
        let b = slot(&grid, 2, 0);
        let id = blocks.create(&mut grid, a, 2).unwrap();
        blocks.assign_to(&mut grid, id, b).unwrap();
        assert!(!grid.is_occupied(a));
        assert_eq!(grid.occupant(b), Some(id));
        assert_eq!(blocks.get(id).unwrap().slot, b);
    }

    #[test]
    fn assign_to_refuses_taken_slot() {
        let mut grid = Grid::new(2, 1);
        let mut blocks = BlockRegistry::new();
        let a = slot(&grid, 0, 0);
        let b = slot(&grid, 1, 0);
        let first = blocks.create(&mut grid, a, 2).unwrap();
        blocks.create(&mut grid, b, 4).unwrap();
        assert!(blocks.assign_to(&mut grid, first, b).is_err());
        assert_eq!(grid.occupant(a), Some(first));
    }

    #[test]
    fn remove_frees_slot() {
        let mut grid = Grid::new(2, 1);
        let mut blocks = BlockRegistry::new();
        let a = slot(&grid, 0, 0);
        let id = blocks.create(&mut grid, a, 8).unwrap();
        let removed = blocks.remove(&mut grid, id).unwrap();
        assert_eq!(removed.value, 8);
        assert!(!grid.is_occupied(a));
        assert!(blocks.is_empty());
        assert!(matches!(blocks.remove(&mut grid, id), Err(GameError::UnknownBlock(_))));
    }

    #[test]
    fn merge_eligibility() {
        let mut grid = Grid::new(3, 1);
        let mut blocks = BlockRegistry::new();
        let (left, middle) = (slot(&grid, 0, 0), slot(&grid, 1, 0));
        let mover = blocks.create(&mut grid, middle, 2).unwrap();
        let base = blocks.create(&mut grid, left, 2).unwrap();
        assert!(blocks.can_merge_with(base, 2));
        assert!(!blocks.can_merge_with(base, 4));

        blocks.begin_merge(&mut grid, mover, base).unwrap();
        assert!(!blocks.can_merge_with(base, 2), "merging base is locked");
        assert!(!blocks.can_merge_with(mover, 2), "mover already has a target");
        assert!(!grid.is_occupied(middle));
        assert_eq!(blocks.get(mover).unwrap().merge_target, Some(base));
    }

    #[test]
    fn largest_value_is_never_mergeable() {
        let mut grid = Grid::new(2, 1);
        let mut blocks = BlockRegistry::new();
        let s = slot(&grid, 0, 0);
        let top = blocks.create(&mut grid, s, 1 << 31).unwrap();
        assert!(!blocks.can_merge_with(top, 1 << 31));
        assert!(!blocks.get(top).unwrap().can_merge_with(1 << 31));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut grid = Grid::new(1, 1);
        let mut blocks = BlockRegistry::new();
        let s = slot(&grid, 0, 0);
        let first = blocks.create(&mut grid, s, 2).unwrap();
        blocks.remove(&mut grid, first).unwrap();
        let second = blocks.create(&mut grid, s, 2).unwrap();
        assert_ne!(first, second);
    }
}
