use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// FNV-1a 64-bit over a byte stream
pub fn fnv1a64(bytes: impl IntoIterator<Item = u8>) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x0000_0100_0000_01B3);
    }
    h
}

/// Plain-data copy of a board, cells as [`Tile::code`](crate::types::Tile::code)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major cell codes
    pub cells: Vec<u8>,
    pub board_hash: u64,
}

impl GridSnapshot {
    pub fn code_at(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks(self.width.max(1))
    }
}

impl From<&Grid> for GridSnapshot {
    fn from(grid: &Grid) -> Self {
        let cells: Vec<u8> = grid.cells().iter().map(|t| t.code()).collect();
        let board_hash = fnv1a64(cells.iter().copied());
        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
            board_hash,
        }
    }
}
