//! Level progression - score curve, grid shape and obstacle spawning
//!
//! Level 1 starts at zero points. Each later level costs a geometrically
//! growing increment; the running increment is multiplied by
//! `LEVEL_GROWTH_FACTOR` after every level and rounded when it is added.
//!
//! From `SMALL_GRID_LEVEL` on the board switches to the small shape in one
//! step. Levels `UNBREAKABLE_FIRST_LEVEL..=UNBREAKABLE_LAST_LEVEL` may start
//! with pinned 2x2 unbreakable blocks.

use crate::grid::Grid;
use crate::rng::RngStream;
use crate::types::{
    Coord, GridSize, Tile, LARGE_GRID, LEVEL_BASE_THRESHOLD, LEVEL_GROWTH_FACTOR,
    SMALL_GRID, SMALL_GRID_LEVEL, UNBREAKABLE_BLOCK_SIZE, UNBREAKABLE_DOUBLE_LEVEL,
    UNBREAKABLE_FIRST_LEVEL, UNBREAKABLE_LAST_LEVEL, UNBREAKABLE_MAX_CHANCE,
    UNBREAKABLE_MIN_CHANCE, UNBREAKABLE_PLACEMENT_ATTEMPTS,
};

/// Total score needed to reach `level`
pub fn threshold_for_level(level: u32) -> u64 {
    let mut total = 0u64;
    let mut increment = LEVEL_BASE_THRESHOLD;
    for _ in 2..=level {
        total = total.saturating_add(increment.round() as u64);
        increment *= LEVEL_GROWTH_FACTOR;
    }
    total
}

/// Highest level whose threshold is at most `score`
///
/// Thresholds saturate at `u64::MAX`; the level stops climbing once the next
/// threshold no longer grows.
pub fn score_to_level(score: u64) -> u32 {
    let mut level = 1;
    let mut threshold = 0u64;
    let mut increment = LEVEL_BASE_THRESHOLD;
    loop {
        let next = threshold.saturating_add(increment.round() as u64);
        if next == threshold || score < next {
            return level;
        }
        threshold = next;
        increment *= LEVEL_GROWTH_FACTOR;
        level += 1;
    }
}

pub fn uses_small_grid(level: u32) -> bool {
    level >= SMALL_GRID_LEVEL
}

/// Board shape for a level
pub fn desired_grid_size_for_level(level: u32) -> GridSize {
    if uses_small_grid(level) {
        SMALL_GRID
    } else {
        LARGE_GRID
    }
}

/// Probability that a level starts with obstacles, `0.0` outside the range
pub fn unbreakable_chance(level: u32) -> f64 {
    if !(UNBREAKABLE_FIRST_LEVEL..=UNBREAKABLE_LAST_LEVEL).contains(&level) {
        return 0.0;
    }
    let span = f64::from(UNBREAKABLE_LAST_LEVEL - UNBREAKABLE_FIRST_LEVEL);
    let t = f64::from(level - UNBREAKABLE_FIRST_LEVEL) / span;
    UNBREAKABLE_MIN_CHANCE + (UNBREAKABLE_MAX_CHANCE - UNBREAKABLE_MIN_CHANCE) * t
}

/// Blocks to place when obstacles spawn
pub fn unbreakable_blocks_for_level(level: u32) -> usize {
    if level < UNBREAKABLE_DOUBLE_LEVEL {
        1
    } else {
        2
    }
}

fn block_cells(top_left: Coord) -> impl Iterator<Item = Coord> {
    (0..UNBREAKABLE_BLOCK_SIZE).flat_map(move |dy| {
        (0..UNBREAKABLE_BLOCK_SIZE).map(move |dx| Coord::new(top_left.x + dx, top_left.y + dy))
    })
}

/// Whether a block fits at `top_left` without leaving the grid or covering
/// another obstacle
pub fn can_place_block(grid: &Grid, top_left: Coord) -> bool {
    let far = UNBREAKABLE_BLOCK_SIZE - 1;
    if top_left.x + far >= grid.width() || top_left.y + far >= grid.height() {
        return false;
    }
    block_cells(top_left).all(|c| !grid.tile(c).is_unbreakable())
}

/// Pin a block of unbreakables at `top_left`
///
/// Callers check [`can_place_block`] first; cells outside the grid are
/// skipped.
pub fn place_unbreakable_block(grid: &mut Grid, top_left: Coord) {
    for c in block_cells(top_left) {
        let _ = grid.set(c.x, c.y, Tile::Unbreakable);
    }
}

/// Roll for level-start obstacles and place them.
///
/// Returns the number of blocks placed. Candidates on the top row are
/// rejected so refills always have a way in.
pub fn maybe_spawn_unbreakables(grid: &mut Grid, rng: &RngStream, level: u32) -> usize {
    let chance = unbreakable_chance(level);
    if chance <= 0.0 {
        return 0;
    }
    if rng.next_f64() > chance {
        return 0;
    }
    if grid.width() < UNBREAKABLE_BLOCK_SIZE || grid.height() < UNBREAKABLE_BLOCK_SIZE {
        return 0;
    }

    let mut placed = 0;
    for _ in 0..unbreakable_blocks_for_level(level) {
        if try_place_block(grid, rng) {
            placed += 1;
        }
    }
    placed
}

/// Try random top-left cells below the top row until one block fits
fn try_place_block(grid: &mut Grid, rng: &RngStream) -> bool {
    for _ in 0..UNBREAKABLE_PLACEMENT_ATTEMPTS {
        let x = rng.int(0, grid.width() - UNBREAKABLE_BLOCK_SIZE);
        let y = rng.int(0, grid.height() - UNBREAKABLE_BLOCK_SIZE);
        if y == 0 {
            continue;
        }
        let top_left = Coord::new(x, y);
        if can_place_block(grid, top_left) {
            place_unbreakable_block(grid, top_left);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_curve() {
        assert_eq!(threshold_for_level(0), 0);
        assert_eq!(threshold_for_level(1), 0);
        assert_eq!(threshold_for_level(2), 3500);
        assert_eq!(threshold_for_level(3), 7630);
        assert_eq!(threshold_for_level(4), 12503);
        assert_eq!(threshold_for_level(7), 33047);
    }

    #[test]
    fn test_score_to_level_boundaries() {
        assert_eq!(score_to_level(0), 1);
        assert_eq!(score_to_level(3499), 1);
        assert_eq!(score_to_level(3500), 2);
        assert_eq!(score_to_level(7629), 2);
        assert_eq!(score_to_level(7630), 3);
    }

    #[test]
    fn test_score_to_level_saturated_score() {
        let top = score_to_level(u64::MAX);
        assert!(top > 200);
        assert_eq!(threshold_for_level(top), u64::MAX);
        assert!(threshold_for_level(top - 1) < u64::MAX);
        assert_eq!(score_to_level(u64::MAX - 1), top - 1);
    }

    #[test]
    fn test_grid_shape_cutover() {
        assert_eq!(desired_grid_size_for_level(1), GridSize::new(12, 10));
        assert_eq!(desired_grid_size_for_level(20), GridSize::new(12, 10));
        assert_eq!(desired_grid_size_for_level(21), GridSize::new(6, 5));
        assert_eq!(desired_grid_size_for_level(40), GridSize::new(6, 5));
    }

    #[test]
    fn test_unbreakable_chance_ramp() {
        assert_eq!(unbreakable_chance(10), 0.0);
        assert!((unbreakable_chance(11) - 0.3).abs() < 1e-9);
        assert!((unbreakable_chance(20) - 0.6).abs() < 1e-9);
        assert_eq!(unbreakable_chance(21), 0.0);
        assert_eq!(unbreakable_blocks_for_level(15), 1);
        assert_eq!(unbreakable_blocks_for_level(16), 2);
    }

    #[test]
    fn test_block_placement_bounds() {
        let grid = Grid::new(6, 5, RngStream::new(1));
        assert!(can_place_block(&grid, Coord::new(4, 3)));
        assert!(!can_place_block(&grid, Coord::new(5, 3)));
        assert!(!can_place_block(&grid, Coord::new(4, 4)));
    }

    #[test]
    fn test_blocks_do_not_overlap() {
        let mut grid = Grid::new(6, 5, RngStream::new(1));
        place_unbreakable_block(&mut grid, Coord::new(1, 1));
        assert_eq!(grid.unbreakable_coords().len(), 4);
        assert!(!can_place_block(&grid, Coord::new(2, 2)));
        assert!(can_place_block(&grid, Coord::new(3, 1)));
    }

    #[test]
    fn test_no_spawn_outside_range_keeps_rng_untouched() {
        let rng = RngStream::new(9);
        let twin = RngStream::new(9);
        let mut grid = Grid::filled(12, 10, Tile::Empty, RngStream::new(2));
        assert_eq!(maybe_spawn_unbreakables(&mut grid, &rng, 5), 0);
        assert_eq!(rng.next_u32(), twin.next_u32());
    }
}
