//! Grid tests - bounds, swaps, gravity segments and refill

use jelly_cascade::core::{find_matches, Grid, GridError, RngStream};
use jelly_cascade::types::{Color, Coord, Tile};

const R: Tile = Tile::Jelly(Color::Red);
const G: Tile = Tile::Jelly(Color::Green);
const B: Tile = Tile::Jelly(Color::Blue);
const U: Tile = Tile::Unbreakable;
const E: Tile = Tile::Empty;

fn column(tiles: &[Tile]) -> Grid {
    let rows = tiles.iter().map(|t| vec![*t]).collect();
    Grid::from_rows(rows, RngStream::new(1)).unwrap()
}

fn column_tiles(grid: &Grid) -> Vec<Tile> {
    (0..grid.height()).map(|y| grid.get(0, y).unwrap()).collect()
}

#[test]
fn test_grid_new_is_full() {
    let grid = Grid::new(12, 10, RngStream::new(42));
    assert_eq!(grid.width(), 12);
    assert_eq!(grid.height(), 10);
    assert_eq!(grid.count_empty(), 0);
    assert!(grid.unbreakable_coords().is_empty());
}

#[test]
fn test_get_set_out_of_bounds() {
    let mut grid = Grid::new(4, 3, RngStream::new(1));
    assert!(matches!(
        grid.get(4, 0),
        Err(GridError::OutOfBounds { x: 4, y: 0, .. })
    ));
    assert!(grid.get(0, 3).is_err());
    assert!(grid.set(9, 9, R).is_err());
    assert!(grid.set(3, 2, R).is_ok());
    assert_eq!(grid.get(3, 2).unwrap(), R);
}

#[test]
fn test_set_row_checks_length() {
    let mut grid = Grid::new(3, 2, RngStream::new(1));
    assert_eq!(
        grid.set_row(0, &[R, G]),
        Err(GridError::RowLength {
            expected: 3,
            actual: 2
        })
    );
    grid.set_row(1, &[B, B, U]).unwrap();
    assert_eq!(grid.to_rows()[1], vec![B, B, U]);
}

#[test]
fn test_swap_twice_restores() {
    let mut grid = Grid::new(5, 5, RngStream::new(3));
    let before = grid.clone();
    let (a, b) = (Coord::new(1, 1), Coord::new(1, 2));
    grid.swap(a, b).unwrap();
    grid.swap(a, b).unwrap();
    assert_eq!(grid, before);
    assert!(grid.swap(a, Coord::new(5, 1)).is_err());
}

#[test]
fn test_clone_shares_rng_stream() {
    let grid = Grid::new(3, 3, RngStream::new(8));
    let copy = grid.clone();
    assert!(copy.rng().same_stream(grid.rng()));
    assert_eq!(copy, grid);
}

#[test]
fn test_clone_continues_sequence() {
    let grid = Grid::filled(2, 2, E, RngStream::new(5));

    let mut first = grid.clone();
    first.refill();
    let mut second = grid.clone();
    second.refill();

    // Only the first clone matches a fresh stream; the second continued it
    let mut replay = Grid::filled(2, 2, E, RngStream::new(5));
    replay.refill();
    assert_eq!(first, replay);

    let twin = RngStream::new(5);
    for _ in 0..8 {
        twin.next_u32();
    }
    assert_eq!(grid.rng().next_u32(), twin.next_u32());
}

#[test]
fn test_gravity_respects_unbreakable_segments() {
    let mut grid = column(&[R, E, U, G, E]);
    grid.apply_gravity();
    assert_eq!(column_tiles(&grid), vec![E, R, U, E, G]);
}

#[test]
fn test_gravity_keeps_order() {
    let mut grid = column(&[R, E, G, E, B, E]);
    grid.apply_gravity();
    assert_eq!(column_tiles(&grid), vec![E, E, E, R, G, B]);
}

#[test]
fn test_single_unbreakable_cell_at_bottom() {
    let mut grid = column(&[R, G, E, U]);
    grid.apply_gravity();
    assert_eq!(column_tiles(&grid), vec![E, R, G, U]);
}

#[test]
fn test_refill_after_gravity_leaves_no_empties() {
    let rows = vec![
        vec![R, E, B, E],
        vec![E, U, E, G],
        vec![G, U, E, E],
    ];
    let mut grid = Grid::from_rows(rows, RngStream::new(2)).unwrap();
    let obstacles = grid.unbreakable_coords();
    grid.apply_gravity();
    grid.refill();
    assert_eq!(grid.count_empty(), 0);
    assert_eq!(grid.unbreakable_coords(), obstacles);
}

#[test]
fn test_populate_avoids_matches_and_keeps_obstacles() {
    for seed in 0..20 {
        let mut grid = Grid::new(12, 10, RngStream::new(seed));
        grid.set(4, 4, U).unwrap();
        grid.set(5, 4, U).unwrap();
        grid.populate(true);
        assert!(find_matches(&grid).is_empty(), "seed {}", seed);
        assert_eq!(grid.get(4, 4).unwrap(), U);
        assert_eq!(grid.get(5, 4).unwrap(), U);
        assert_eq!(grid.count_empty(), 0);
    }
}
