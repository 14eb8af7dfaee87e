use crate::game::entities::BlockRegistry;
use crate::game::grid::Grid;
use crate::game::types::Direction;

/// True if any direction would move or merge at least one block.
pub fn has_valid_move(grid: &Grid, blocks: &BlockRegistry) -> bool {
    Direction::ALL
        .iter()
        .any(|&direction| can_shift(grid, blocks, direction))
}

/// True if `direction` would move or merge at least one block.
/// Read-only: a free neighbor or an equal neighbor ahead is enough.
pub fn can_shift(grid: &Grid, blocks: &BlockRegistry, direction: Direction) -> bool {
    blocks.iter().any(|block| match grid.neighbor(block.slot, direction) {
        None => false,
        Some(next) => match grid.occupant(next) {
            None => true,
            Some(other) => blocks.can_merge_with(other, block.value),
        },
    })
}

pub fn has_won(blocks: &BlockRegistry, win_value: u32) -> bool {
    blocks.contains_value(win_value)
}

/// The board is full and nothing can move in any direction.
pub fn is_stuck(grid: &Grid, blocks: &BlockRegistry) -> bool {
    grid.is_full() && !has_valid_move(grid, blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::systems::resolve_shift;
    use crate::game::types::Position;

    fn board(width: usize, height: usize, values: &[u32]) -> (Grid, BlockRegistry) {
        let mut grid = Grid::new(width, height);
        let mut blocks = BlockRegistry::new();
        for (i, &value) in values.iter().enumerate() {
            if value == 0 {
                continue;
            }
            let slot = grid.slot_at(Position::new(i % width, i / width)).unwrap();
            blocks.create(&mut grid, slot, value).unwrap();
        }
        (grid, blocks)
    }

    #[test]
    fn checkerboard_is_stuck() {
        let (grid, blocks) = board(2, 2, &[2, 4, 4, 2]);
        assert!(!has_valid_move(&grid, &blocks));
        assert!(is_stuck(&grid, &blocks));
    }

    #[test]
    fn equal_neighbors_keep_game_alive() {
        let (grid, blocks) = board(2, 2, &[2, 2, 4, 8]);
        assert!(has_valid_move(&grid, &blocks));
        assert!(!is_stuck(&grid, &blocks));
    }

    #[test]
    fn can_shift_agrees_with_resolver() {
        let layouts: [&[u32]; 4] = [
            &[2, 0, 0, 4, 8, 16, 0, 0, 0],
            &[2, 4, 8, 16, 32, 64, 128, 256, 512],
            &[2, 2, 4, 0, 0, 0, 0, 0, 4],
            &[0, 0, 0, 0, 2, 0, 0, 0, 0],
        ];
        for layout in layouts {
            for direction in Direction::ALL {
                let (mut grid, mut blocks) = board(3, 3, layout);
                let predicted = can_shift(&grid, &blocks, direction);
                let plan = resolve_shift(&mut grid, &mut blocks, direction).unwrap();
                assert_eq!(predicted, plan.valid, "{layout:?} {direction:?}");
            }
        }
    }

    #[test]
    fn win_detection_matches_exact_value() {
        let (_, blocks) = board(2, 1, &[1024, 2048]);
        assert!(has_won(&blocks, 2048));
        assert!(!has_won(&blocks, 4096));
    }
}
