//! Grid module - the playfield
//!
//! A `width x height` board of [`Tile`]s stored as a flat row-major vector.
//! Coordinates: (x, y) where x ranges 0..width (left to right) and y ranges
//! 0..height (top to bottom). Gravity pulls toward the bottom row.
//!
//! The grid owns a handle onto the session [`RngStream`] and uses it for
//! refills. Clones share the stream and continue its sequence.

use thiserror::Error;

use crate::rng::RngStream;
use crate::types::{Color, Coord, GridSize, Tile, MIN_RUN_LENGTH};

/// Misuse of the grid API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("row has {actual} tiles, grid width is {expected}")]
    RowLength { expected: usize, actual: usize },
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    ZeroSize { width: usize, height: usize },
}

/// The game board
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Flat array of tiles, row-major order (y * width + x)
    cells: Vec<Tile>,
    rng: RngStream,
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl Grid {
    /// Create a grid filled with uniformly random jellies
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: usize, height: usize, rng: RngStream) -> Self {
        let mut grid = Self::filled(width, height, Tile::Empty, rng);
        grid.refill();
        grid
    }

    /// Create a grid with every cell set to `tile`
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn filled(width: usize, height: usize, tile: Tile, rng: RngStream) -> Self {
        assert!(
            width > 0 && height > 0,
            "{}",
            GridError::ZeroSize { width, height }
        );
        Self {
            width,
            height,
            cells: vec![tile; width * height],
            rng,
        }
    }

    /// Create a grid from rows of tiles (top row first)
    pub fn from_rows(rows: Vec<Vec<Tile>>, rng: RngStream) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(GridError::ZeroSize { width, height });
        }

        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            if row.len() != width {
                return Err(GridError::RowLength {
                    expected: width,
                    actual: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            width,
            height,
            cells,
            rng,
        })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    fn checked_index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        self.index(x, y).ok_or(GridError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    /// Handle onto the refill stream
    pub fn rng(&self) -> &RngStream {
        &self.rng
    }

    /// Point refills at another stream
    pub fn set_rng(&mut self, rng: RngStream) {
        self.rng = rng;
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Get tile at (x, y)
    pub fn get(&self, x: usize, y: usize) -> Result<Tile, GridError> {
        self.checked_index(x, y).map(|idx| self.cells[idx])
    }

    /// Set tile at (x, y)
    pub fn set(&mut self, x: usize, y: usize, tile: Tile) -> Result<(), GridError> {
        let idx = self.checked_index(x, y)?;
        self.cells[idx] = tile;
        Ok(())
    }

    /// Tile at a coordinate already known to be in bounds
    ///
    /// # Panics
    ///
    /// Panics if `at` is outside the grid.
    #[inline]
    pub fn tile(&self, at: Coord) -> Tile {
        match self.index(at.x, at.y) {
            Some(idx) => self.cells[idx],
            None => panic!(
                "{}",
                GridError::OutOfBounds {
                    x: at.x,
                    y: at.y,
                    width: self.width,
                    height: self.height,
                }
            ),
        }
    }

    /// Overwrite a whole row
    pub fn set_row(&mut self, y: usize, tiles: &[Tile]) -> Result<(), GridError> {
        if tiles.len() != self.width {
            return Err(GridError::RowLength {
                expected: self.width,
                actual: tiles.len(),
            });
        }
        let start = self.checked_index(0, y)?;
        self.cells[start..start + self.width].copy_from_slice(tiles);
        Ok(())
    }

    /// Exchange two cells unconditionally; legality is the caller's concern
    pub fn swap(&mut self, a: Coord, b: Coord) -> Result<(), GridError> {
        let ai = self.checked_index(a.x, a.y)?;
        let bi = self.checked_index(b.x, b.y)?;
        self.cells.swap(ai, bi);
        Ok(())
    }

    /// Clear a cell to empty unless it holds an unbreakable.
    ///
    /// Returns true if the cell was cleared.
    pub(crate) fn clear_cell(&mut self, at: Coord) -> bool {
        let Some(idx) = self.index(at.x, at.y) else {
            return false;
        };
        match self.cells[idx] {
            Tile::Unbreakable => false,
            Tile::Jelly(_) | Tile::Empty => {
                self.cells[idx] = Tile::Empty;
                true
            }
        }
    }

    /// Compact tiles toward the bottom, column by column.
    ///
    /// Unbreakables split a column into independent segments. Within each
    /// segment non-empty tiles keep their relative order and the vacated cells
    /// at the top of the segment become empty.
    pub fn apply_gravity(&mut self) {
        let width = self.width;
        for x in 0..width {
            let mut segment_bottom = self.height;
            for y in (0..=self.height).rev() {
                let boundary = y == 0 || self.cells[(y - 1) * width + x].is_unbreakable();
                if !boundary {
                    continue;
                }
                // Segment spans rows y..segment_bottom (exclusive), possibly empty.
                self.compact_segment(x, y, segment_bottom);
                segment_bottom = y.saturating_sub(1);
            }
        }
    }

    fn compact_segment(&mut self, x: usize, top: usize, bottom: usize) {
        if top >= bottom {
            return;
        }
        let width = self.width;
        let mut write_y = bottom;
        for read_y in (top..bottom).rev() {
            let tile = self.cells[read_y * width + x];
            if tile.is_empty() {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                self.cells[write_y * width + x] = tile;
            }
        }
        for y in top..write_y {
            self.cells[y * width + x] = Tile::Empty;
        }
    }

    /// Replace every empty cell with a fresh random jelly
    pub fn refill(&mut self) {
        let width = self.width;
        for x in 0..width {
            for y in 0..self.height {
                let idx = y * width + x;
                if self.cells[idx].is_empty() {
                    self.cells[idx] = Tile::Jelly(self.random_color());
                }
            }
        }
    }

    fn random_color(&self) -> Color {
        Color::ALL[self.rng.next_range(Color::ALL.len())]
    }

    /// Recolour every movable cell.
    ///
    /// With `avoid_matches` set, each cell draws from the colours that would
    /// not complete a run to its left or above, so the result has no matches.
    pub fn populate(&mut self, avoid_matches: bool) {
        let width = self.width;
        for y in 0..self.height {
            for x in 0..width {
                let idx = y * width + x;
                if self.cells[idx].is_unbreakable() {
                    continue;
                }
                let color = if avoid_matches {
                    let allowed: Vec<Color> = Color::ALL
                        .iter()
                        .copied()
                        .filter(|c| !self.completes_run(x, y, *c))
                        .collect();
                    self.rng
                        .pick(&allowed)
                        .unwrap_or_else(|| self.random_color())
                } else {
                    self.random_color()
                };
                self.cells[idx] = Tile::Jelly(color);
            }
        }
    }

    /// Whether placing `color` at (x, y) extends an existing run to the left
    /// or above into a full match.
    fn completes_run(&self, x: usize, y: usize, color: Color) -> bool {
        let need = MIN_RUN_LENGTH - 1;
        let left = x >= need
            && (1..=need).all(|d| self.cells[y * self.width + x - d] == Tile::Jelly(color));
        let up = y >= need
            && (1..=need).all(|d| self.cells[(y - d) * self.width + x] == Tile::Jelly(color));
        left || up
    }

    /// Iterate over `(coord, tile)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Tile)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, t)| (Coord::new(i % width, i / width), *t))
    }

    /// Coordinates of every movable (non-unbreakable) cell, row-major
    pub fn movable_coords(&self) -> Vec<Coord> {
        self.iter()
            .filter(|(_, t)| t.is_movable())
            .map(|(c, _)| c)
            .collect()
    }

    /// Coordinates of every unbreakable cell, row-major
    pub fn unbreakable_coords(&self) -> Vec<Coord> {
        self.iter()
            .filter(|(_, t)| t.is_unbreakable())
            .map(|(c, _)| c)
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|t| t.is_empty()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Convert to 2D rows for testing/display
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.cells.chunks(self.width).map(<[Tile]>::to_vec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: Tile = Tile::Jelly(Color::Red);
    const G: Tile = Tile::Jelly(Color::Green);
    const B: Tile = Tile::Jelly(Color::Blue);
    const U: Tile = Tile::Unbreakable;
    const E: Tile = Tile::Empty;

    fn column(grid: &Grid, x: usize) -> Vec<Tile> {
        (0..grid.height()).map(|y| grid.tile(Coord::new(x, y))).collect()
    }

    fn single_column(tiles: &[Tile]) -> Grid {
        let rows = tiles.iter().map(|t| vec![*t]).collect();
        Grid::from_rows(rows, RngStream::new(1)).unwrap()
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::filled(4, 3, R, RngStream::new(1));
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(3, 0), Some(3));
        assert_eq!(grid.index(0, 1), Some(4));
        assert_eq!(grid.index(3, 2), Some(11));
        assert_eq!(grid.index(4, 0), None);
        assert_eq!(grid.index(0, 3), None);
    }

    #[test]
    fn test_gravity_plain_column() {
        let mut grid = single_column(&[R, E, G, E, B]);
        grid.apply_gravity();
        assert_eq!(column(&grid, 0), vec![E, E, R, G, B]);
    }

    #[test]
    fn test_gravity_stops_at_unbreakable() {
        // Top segment: rows 0..2, obstacle at rows 2..4, bottom segment rows 4..6
        let mut grid = single_column(&[R, E, U, U, G, E]);
        grid.apply_gravity();
        assert_eq!(column(&grid, 0), vec![E, R, U, U, E, G]);
    }

    #[test]
    fn test_gravity_obstacle_on_bottom_row() {
        let mut grid = single_column(&[G, E, R, U]);
        grid.apply_gravity();
        assert_eq!(column(&grid, 0), vec![E, G, R, U]);
    }

    #[test]
    fn test_gravity_obstacle_on_top_row() {
        let mut grid = single_column(&[U, B, E, E]);
        grid.apply_gravity();
        assert_eq!(column(&grid, 0), vec![U, E, E, B]);
    }

    #[test]
    fn test_refill_leaves_no_empties() {
        let mut grid = Grid::filled(5, 4, E, RngStream::new(9));
        grid.set(2, 2, U).unwrap();
        grid.refill();
        assert_eq!(grid.count_empty(), 0);
        assert_eq!(grid.tile(Coord::new(2, 2)), U);
    }

    #[test]
    fn test_populate_without_matches_has_no_runs() {
        let mut grid = Grid::filled(12, 10, E, RngStream::new(5));
        grid.populate(true);
        assert_eq!(grid.count_empty(), 0);
        for (at, tile) in grid.iter() {
            if at.x >= 2 {
                let row = [
                    grid.tile(Coord::new(at.x - 2, at.y)),
                    grid.tile(Coord::new(at.x - 1, at.y)),
                ];
                assert!(row != [tile, tile], "horizontal triple ending at {:?}", at);
            }
            if at.y >= 2 {
                let col = [
                    grid.tile(Coord::new(at.x, at.y - 2)),
                    grid.tile(Coord::new(at.x, at.y - 1)),
                ];
                assert!(col != [tile, tile], "vertical triple ending at {:?}", at);
            }
        }
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Grid::from_rows(vec![vec![R, G], vec![B]], RngStream::new(1)).unwrap_err();
        assert_eq!(
            err,
            GridError::RowLength {
                expected: 2,
                actual: 1
            }
        );
    }
}
