//! Deadlock detection and reshuffle
//!
//! A board is deadlocked when no adjacent swap produces a match. Detection
//! tries every adjacent pair once (right neighbour and down neighbour of each
//! cell, row-major) on a scratch copy of the board.
//!
//! Reshuffling permutes the tiles on movable cells in place with the session
//! RNG; unbreakables keep their cells. It runs in two phases of
//! `max_attempts` shuffles each: the first phase also rejects boards with a
//! ready-made match, the second accepts any board with a legal swap.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::matcher::Match;
use crate::rng::RngStream;
use crate::types::{Coord, Swap, Tile, DEFAULT_RESHUFFLE_ATTEMPTS};

/// Reshuffle tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReshuffleOptions {
    /// Shuffles tried per phase
    pub max_attempts: u32,
    /// Whether phase one rejects boards that already contain a match
    pub avoid_immediate_matches: bool,
}

impl Default for ReshuffleOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RESHUFFLE_ATTEMPTS,
            avoid_immediate_matches: true,
        }
    }
}

fn can_swap_cells(a: Tile, b: Tile) -> bool {
    a.is_movable() && b.is_movable()
}

/// Right and down neighbour pairs of `at` that lie inside the grid
fn forward_pairs(grid: &Grid, at: Coord) -> ArrayVec<Coord, 2> {
    let mut out = ArrayVec::new();
    if at.x + 1 < grid.width() {
        out.push(Coord::new(at.x + 1, at.y));
    }
    if at.y + 1 < grid.height() {
        out.push(Coord::new(at.x, at.y + 1));
    }
    out
}

/// First adjacent swap (row-major scan, right before down) that creates a match
pub fn find_first_legal_swap<M>(grid: &Grid, find: M) -> Option<Swap>
where
    M: Fn(&Grid) -> Vec<Match>,
{
    let mut trial = grid.clone();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let current = Coord::new(x, y);
            for neighbour in forward_pairs(grid, current) {
                if !can_swap_cells(trial.tile(current), trial.tile(neighbour)) {
                    continue;
                }
                // Both coordinates come from the scan and are in bounds.
                let _ = trial.swap(current, neighbour);
                let makes_match = !find(&trial).is_empty();
                let _ = trial.swap(current, neighbour);
                if makes_match {
                    return Some(Swap::new(current, neighbour));
                }
            }
        }
    }
    None
}

/// Whether any adjacent swap would create a match
pub fn has_any_legal_swap<M>(grid: &Grid, find: M) -> bool
where
    M: Fn(&Grid) -> Vec<Match>,
{
    find_first_legal_swap(grid, find).is_some()
}

/// Shuffle movable tiles in place until the board has a legal swap.
///
/// Returns `false` when fewer than two movable tiles exist or both phases run
/// out of attempts. On failure the grid keeps its last shuffled state rather
/// than the board it started from.
pub fn reshuffle_in_place<M>(
    grid: &mut Grid,
    rng: &RngStream,
    find: M,
    options: ReshuffleOptions,
) -> bool
where
    M: Fn(&Grid) -> Vec<Match>,
{
    let coords = grid.movable_coords();
    if coords.len() < 2 {
        return false;
    }
    let mut extracted: Vec<Tile> = coords.iter().map(|c| grid.tile(*c)).collect();

    let phases = [options.avoid_immediate_matches, false];
    for reject_matches in phases {
        for _ in 0..options.max_attempts {
            rng.shuffle(&mut extracted);
            for (at, tile) in coords.iter().zip(&extracted) {
                // Coordinates were collected from this grid.
                let _ = grid.set(at.x, at.y, *tile);
            }

            if reject_matches && !find(&*grid).is_empty() {
                continue;
            }
            if has_any_legal_swap(grid, &find) {
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_matches;
    use crate::types::Color;

    const R: Tile = Tile::Jelly(Color::Red);
    const G: Tile = Tile::Jelly(Color::Green);
    const B: Tile = Tile::Jelly(Color::Blue);
    const Y: Tile = Tile::Jelly(Color::Yellow);

    fn grid(rows: Vec<Vec<Tile>>) -> Grid {
        Grid::from_rows(rows, RngStream::new(3)).unwrap()
    }

    #[test]
    fn test_forward_pairs_at_edges() {
        let g = grid(vec![vec![R, G], vec![B, Y]]);
        assert_eq!(forward_pairs(&g, Coord::new(0, 0)).len(), 2);
        assert_eq!(forward_pairs(&g, Coord::new(1, 0)).len(), 1);
        assert_eq!(forward_pairs(&g, Coord::new(1, 1)).len(), 0);
    }

    #[test]
    fn test_finds_horizontal_completion() {
        // Swapping (2,0) and (2,1) gives R R R on the top row
        let g = grid(vec![vec![R, R, G, B], vec![G, B, R, Y]]);
        assert_eq!(
            find_first_legal_swap(&g, find_matches),
            Some(Swap::new(Coord::new(2, 0), Coord::new(2, 1)))
        );
    }

    #[test]
    fn test_unbreakable_pairs_are_skipped() {
        let g = grid(vec![vec![R, R, Tile::Unbreakable, R]]);
        assert!(!has_any_legal_swap(&g, find_matches));
    }

    #[test]
    fn test_scan_leaves_grid_untouched() {
        let g = grid(vec![vec![R, G, B], vec![G, B, R], vec![B, R, G]]);
        let before = g.clone();
        let _ = has_any_legal_swap(&g, find_matches);
        assert_eq!(g, before);
    }

    #[test]
    fn test_reshuffle_single_movable_tile_fails() {
        let mut g = grid(vec![vec![R, Tile::Unbreakable]]);
        let rng = RngStream::new(1);
        assert!(!reshuffle_in_place(
            &mut g,
            &rng,
            find_matches,
            ReshuffleOptions::default()
        ));
    }
}
