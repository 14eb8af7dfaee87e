//! Block spawning.
//!
//! Picks free slots at random and drops new blocks on them. The spawner never
//! decides phase transitions; it reports what it saw so the session can.

use log::{debug, warn};
use rand::Rng;
use rand::seq::IteratorRandom;

use crate::config::SpawnWeight;
use crate::error::GameError;
use crate::game::entities::BlockRegistry;
use crate::game::grid::Grid;
use crate::game::types::BlockId;

/// Outcome of one spawn call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpawnReport {
    /// Free slots before anything was placed.
    pub free_before: usize,
    pub spawned: Vec<BlockId>,
}

/// Place up to `amount` new blocks on distinct free slots, chosen uniformly.
/// When fewer slots are free, all of them are filled.
pub fn spawn_blocks<R: Rng + ?Sized>(
    grid: &mut Grid,
    blocks: &mut BlockRegistry,
    table: &[SpawnWeight],
    amount: usize,
    rng: &mut R,
) -> Result<SpawnReport, GameError> {
    let free_slots = grid.free_slots();
    let free_before = free_slots.len();

    if free_before == 0 {
        warn!("[Spawner] No free slot to place a block!");
        return Ok(SpawnReport { free_before, spawned: vec![] });
    }

    let chosen = free_slots
        .into_iter()
        .choose_multiple(rng, amount.min(free_before));

    let mut spawned = Vec::with_capacity(chosen.len());
    for slot in chosen {
        let value = pick_value(table, rng);
        let id = blocks.create(grid, slot, value)?;
        debug!("[Spawner] Block {} = {} at {:?}", id, value, grid.position(slot));
        spawned.push(id);
    }

    Ok(SpawnReport { free_before, spawned })
}

/// Draw a value from the spawn table. Probabilities are relative weights, so
/// a table that does not sum to exactly 1 still works. Entries whose weight
/// is not a positive finite number are never drawn.
pub fn pick_value<R: Rng + ?Sized>(table: &[SpawnWeight], rng: &mut R) -> u32 {
    let usable = || {
        table
            .iter()
            .filter(|w| w.probability.is_finite() && w.probability > 0.0)
    };
    let total: f64 = usable().map(|w| w.probability).sum();
    if !total.is_finite() || total <= 0.0 {
        return usable()
            .chain(table)
            .next()
            .map(|w| w.value)
            .unwrap_or(2);
    }
    let mut roll = rng.random_range(0.0..total);
    for weight in usable() {
        if roll < weight.probability {
            return weight.value;
        }
        roll -= weight.probability;
    }
    // Rounding can leave a sliver past the last bucket.
    usable().last().map(|w| w.value).unwrap_or(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::game::types::Position;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn spawn_fills_requested_amount_with_small_values() {
        let config = BoardConfig::default();
        let mut grid = Grid::new(4, 4);
        let mut blocks = BlockRegistry::new();
        let mut rng = StdRng::seed_from_u64(7);

        let report = spawn_blocks(&mut grid, &mut blocks, &config.spawn_table, 2, &mut rng).unwrap();
        assert_eq!(report.free_before, 16);
        assert_eq!(report.spawned.len(), 2);
        assert_eq!(grid.free_count(), 14);
        assert!(blocks.iter().all(|b| b.value == 2 || b.value == 4));
    }

    #[test]
    fn spawn_never_reuses_occupied_slots() {
        let config = BoardConfig::default();
        let mut grid = Grid::new(3, 3);
        let mut blocks = BlockRegistry::new();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..9 {
            spawn_blocks(&mut grid, &mut blocks, &config.spawn_table, 1, &mut rng).unwrap();
        }
        assert_eq!(blocks.len(), 9);
        assert!(grid.is_full());
        for block in blocks.iter() {
            assert_eq!(grid.occupant(block.slot), Some(block.id));
        }
    }

    #[test]
    fn spawn_caps_at_free_slots() {
        let config = BoardConfig::default();
        let mut grid = Grid::new(2, 1);
        let mut blocks = BlockRegistry::new();
        let mut rng = StdRng::seed_from_u64(3);
        let taken = grid.slot_at(Position::new(0, 0)).unwrap();
        blocks.create(&mut grid, taken, 2).unwrap();

        let report = spawn_blocks(&mut grid, &mut blocks, &config.spawn_table, 5, &mut rng).unwrap();
        assert_eq!(report.free_before, 1);
        assert_eq!(report.spawned.len(), 1);

        let report = spawn_blocks(&mut grid, &mut blocks, &config.spawn_table, 1, &mut rng).unwrap();
        assert_eq!(report.free_before, 0);
        assert!(report.spawned.is_empty());
    }

    #[test]
    fn value_distribution_follows_table() {
        let table = BoardConfig::default().spawn_table;
        let mut rng = StdRng::seed_from_u64(42);
        let fours = (0..10_000).filter(|_| pick_value(&table, &mut rng) == 4).count();
        // 20% expected; allow a wide margin.
        assert!((1_500..2_500).contains(&fours), "got {fours} fours");
    }

    #[test]
    fn single_entry_table_is_deterministic() {
        let table = [SpawnWeight { value: 8, probability: 1.0 }];
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..100).all(|_| pick_value(&table, &mut rng) == 8));
    }

    #[test]
    fn unusable_weights_are_never_drawn() {
        let table = [
            SpawnWeight { value: 4, probability: f64::INFINITY },
            SpawnWeight { value: 16, probability: f64::NAN },
            SpawnWeight { value: 32, probability: -1.0 },
            SpawnWeight { value: 2, probability: 0.5 },
        ];
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..100).all(|_| pick_value(&table, &mut rng) == 2));

        let table = [SpawnWeight { value: 8, probability: f64::INFINITY }];
        assert_eq!(pick_value(&table, &mut rng), 8);
        assert_eq!(pick_value(&[], &mut rng), 2);
    }
}
