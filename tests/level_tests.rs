//! Level progression tests - score curve, shape cutover and obstacles

use jelly_cascade::core::level::{
    can_place_block, place_unbreakable_block, unbreakable_blocks_for_level, uses_small_grid,
};
use jelly_cascade::core::{
    desired_grid_size_for_level, maybe_spawn_unbreakables, score_to_level, threshold_for_level,
    Grid, RngStream,
};
use jelly_cascade::types::{Coord, GridSize, Tile};

#[test]
fn test_thresholds_strictly_increase() {
    for level in 1..60 {
        assert!(
            threshold_for_level(level + 1) > threshold_for_level(level),
            "level {}",
            level
        );
    }
}

#[test]
fn test_score_to_level_inverts_threshold() {
    for level in 1..=40 {
        let threshold = threshold_for_level(level);
        assert!(score_to_level(threshold) >= level);
        if level > 1 {
            assert_eq!(score_to_level(threshold - 1), level - 1);
        }
    }
}

#[test]
fn test_shape_cutover_at_21() {
    assert_eq!(desired_grid_size_for_level(20), GridSize::new(12, 10));
    assert_eq!(desired_grid_size_for_level(21), GridSize::new(6, 5));
    assert!(!uses_small_grid(20));
    assert!(uses_small_grid(21));
}

#[test]
fn test_block_counts_per_level() {
    assert_eq!(unbreakable_blocks_for_level(11), 1);
    assert_eq!(unbreakable_blocks_for_level(15), 1);
    assert_eq!(unbreakable_blocks_for_level(16), 2);
    assert_eq!(unbreakable_blocks_for_level(20), 2);
}

#[test]
fn test_no_obstacles_outside_range() {
    for level in (1..=10).chain(21..=25) {
        let mut grid = Grid::new(12, 10, RngStream::new(level));
        let rng = RngStream::new(level + 100);
        assert_eq!(maybe_spawn_unbreakables(&mut grid, &rng, level), 0);
        assert!(grid.unbreakable_coords().is_empty());
    }
}

#[test]
fn test_spawned_blocks_are_whole_and_below_top_row() {
    let mut total = 0;
    for seed in 0..40 {
        let mut grid = Grid::new(12, 10, RngStream::new(seed));
        let rng = RngStream::new(seed + 1000);
        let placed = maybe_spawn_unbreakables(&mut grid, &rng, 16);
        assert!(placed <= 2);

        let obstacles = grid.unbreakable_coords();
        assert_eq!(obstacles.len(), placed * 4, "seed {}", seed);
        assert!(obstacles.iter().all(|c| c.y > 0));
        total += placed;
    }
    assert!(total > 0);
}

#[test]
fn test_level_16_seed_places_two_blocks() {
    let mut grid = Grid::new(12, 10, RngStream::new(1));
    let rng = RngStream::new(1001);
    assert_eq!(maybe_spawn_unbreakables(&mut grid, &rng, 16), 2);
}

#[test]
fn test_manual_block_placement() {
    let mut grid = Grid::new(6, 5, RngStream::new(3));
    assert!(can_place_block(&grid, Coord::new(0, 1)));
    place_unbreakable_block(&mut grid, Coord::new(0, 1));
    assert_eq!(
        grid.unbreakable_coords(),
        vec![
            Coord::new(0, 1),
            Coord::new(1, 1),
            Coord::new(0, 2),
            Coord::new(1, 2)
        ]
    );
    assert!(!can_place_block(&grid, Coord::new(1, 2)));
}

#[test]
fn test_each_block_gets_its_own_attempts() {
    // Only two 2x2 slots are free; the second takes 127 tries after the
    // first used 99
    let mut grid = Grid::filled(12, 10, Tile::Unbreakable, RngStream::new(1));
    for top_left in [Coord::new(2, 3), Coord::new(8, 6)] {
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            grid.set(top_left.x + dx, top_left.y + dy, Tile::Empty).unwrap();
        }
    }

    let rng = RngStream::new(135);
    assert_eq!(maybe_spawn_unbreakables(&mut grid, &rng, 16), 2);
    assert_eq!(grid.count_empty(), 0);
}
