use serde::Serialize;

use crate::error::GameError;
use crate::game::types::{BlockId, Direction, Position, SlotId};

/// One cell of the board and the block currently standing on it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub position: Position,
    occupant: Option<BlockId>,
}

impl Slot {
    pub fn occupant(&self) -> Option<BlockId> {
        self.occupant
    }
}

/// Fixed-size board. Slots are stored row by row (`index = y * width + x`),
/// so lookups by position are direct indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    slots: Vec<Slot>,
}

impl Grid {
    /// Build a `width` x `height` grid with every slot free.
    pub fn new(width: usize, height: usize) -> Self {
        let slots = (0..height)
            .flat_map(|y| (0..width).map(move |x| Slot { position: Position { x, y }, occupant: None }))
            .collect();
        Grid { width, height, slots }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Slot at `position`, or `None` outside the board.
    pub fn slot_at(&self, position: Position) -> Option<SlotId> {
        self.contains(position)
            .then(|| SlotId(position.y * self.width + position.x))
    }

    /// Like [`Grid::slot_at`], but out-of-bounds coordinates are an error.
    pub fn require_slot(&self, position: Position) -> Result<SlotId, GameError> {
        self.slot_at(position).ok_or(GameError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        })
    }

    pub fn slot(&self, slot: SlotId) -> &Slot {
        &self.slots[slot.0]
    }

    pub fn position(&self, slot: SlotId) -> Position {
        self.slots[slot.0].position
    }

    /// The slot one step from `slot` towards `direction`, `None` at the edge.
    pub fn neighbor(&self, slot: SlotId, direction: Direction) -> Option<SlotId> {
        self.position(slot)
            .step(direction)
            .and_then(|pos| self.slot_at(pos))
    }

    pub fn is_occupied(&self, slot: SlotId) -> bool {
        self.slots[slot.0].occupant.is_some()
    }

    pub fn occupant(&self, slot: SlotId) -> Option<BlockId> {
        self.slots[slot.0].occupant
    }

    /// Occupancy by coordinates. Querying outside the board is a caller bug.
    pub fn is_occupied_at(&self, position: Position) -> Result<bool, GameError> {
        let slot = self.require_slot(position)?;
        Ok(self.is_occupied(slot))
    }

    pub fn occupant_at(&self, position: Position) -> Result<Option<BlockId>, GameError> {
        let slot = self.require_slot(position)?;
        Ok(self.occupant(slot))
    }

    /// All free slots in row order.
    pub fn free_slots(&self) -> Vec<SlotId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.occupant.is_none())
            .map(|(index, _)| SlotId(index))
            .collect()
    }

    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.occupant.is_none()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| slot.occupant.is_some())
    }

    pub fn slots(&self) -> impl Iterator<Item = (SlotId, &Slot)> {
        self.slots.iter().enumerate().map(|(index, slot)| (SlotId(index), slot))
    }

    // Occupancy writes go through the block registry only.

    pub(crate) fn set_occupant(&mut self, slot: SlotId, block: BlockId) {
        self.slots[slot.0].occupant = Some(block);
    }

    /// Clear `slot` if `block` is the one holding it.
    pub(crate) fn release(&mut self, slot: SlotId, block: BlockId) {
        let cell = &mut self.slots[slot.0];
        if cell.occupant == Some(block) {
            cell.occupant = None;
        }
    }
}
