//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the simulation.
//! All types are plain data with no behaviour beyond small helpers, making them
//! usable in any context (core rules, session engine, renderers, replay tools).
//!
//! # Coordinates
//!
//! Cells are addressed as `(x, y)` where `x` grows left to right and `y` grows
//! top to bottom. Row 0 is the top row; gravity pulls toward the highest `y`.
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_POINTS_PER_TILE` | 10 | Points per cleared tile |
//! | `LASER_BONUS_PER_TILE` | 3 | Extra points per tile hit by a laser |
//! | `BOMB_BONUS_PER_TILE` | 4 | Extra points per tile hit by a bomb |
//! | `BONUS_GRANT_POINTS` | 150 | Flat award when a plus grants the bonus |
//! | `BONUS_USE_POINTS` | 100 | Flat award when the bonus is spent |
//!
//! # Level Curve
//!
//! Level 1 starts at 0 points. Reaching level `k` costs an extra
//! `round(3500 * 1.18^(k-2))` points on top of level `k-1`.
//!
//! | Levels | Grid | Obstacles |
//! |--------|------|-----------|
//! | 1-10 | 12x10 | none |
//! | 11-15 | 12x10 | 1 block (30%..45% chance) |
//! | 16-20 | 12x10 | 2 blocks (47%..60% chance) |
//! | 21+ | 6x5 | none |
//!
//! # Examples
//!
//! ```
//! use jelly_cascade_types::{Color, Coord, Tile, PALETTE_SIZE};
//!
//! let tile = Tile::Jelly(Color::Red);
//! assert!(tile.is_movable());
//! assert_eq!(tile.color(), Some(Color::Red));
//!
//! assert_eq!(Color::from_str("purple"), Some(Color::Purple));
//! assert_eq!(Color::ALL.len(), PALETTE_SIZE);
//!
//! let a = Coord::new(2, 3);
//! assert!(a.is_adjacent(Coord::new(2, 4)));
//! assert!(!a.is_adjacent(Coord::new(3, 4)));
//! ```

use serde::{Deserialize, Serialize};

/// Number of jelly colours in the palette (5)
pub const PALETTE_SIZE: usize = 5;

/// Minimum run length that forms a match (3)
pub const MIN_RUN_LENGTH: usize = 3;

/// Run length that spawns a laser (exactly 4)
pub const LASER_RUN_LENGTH: usize = 4;

/// Run length that spawns a bomb (5 or more)
pub const BOMB_RUN_LENGTH: usize = 5;

/// Bomb blast radius; the blast covers a `(2r+1) x (2r+1)` square
pub const BOMB_RADIUS: usize = 2;

/// Points per cleared tile before any chain multiplier
pub const BASE_POINTS_PER_TILE: u64 = 10;

/// Extra per-tile points for tiles hit by a laser
pub const LASER_BONUS_PER_TILE: u64 = 3;

/// Extra per-tile points for tiles hit by a bomb
pub const BOMB_BONUS_PER_TILE: u64 = 4;

/// Flat award when a plus match grants the one-shot bonus
pub const BONUS_GRANT_POINTS: u64 = 150;

/// Flat award when the one-shot bonus is spent
pub const BONUS_USE_POINTS: u64 = 100;

/// Points needed to go from level 1 to level 2
pub const LEVEL_BASE_THRESHOLD: f64 = 3500.0;

/// Growth of each level's increment over the previous one
pub const LEVEL_GROWTH_FACTOR: f64 = 1.18;

/// First level played on the small grid
pub const SMALL_GRID_LEVEL: u32 = 21;

/// Grid shape below `SMALL_GRID_LEVEL`
pub const LARGE_GRID: GridSize = GridSize::new(12, 10);

/// Grid shape from `SMALL_GRID_LEVEL` on
pub const SMALL_GRID: GridSize = GridSize::new(6, 5);

/// First level that may spawn unbreakable blocks
pub const UNBREAKABLE_FIRST_LEVEL: u32 = 11;

/// Last level that may spawn unbreakable blocks
pub const UNBREAKABLE_LAST_LEVEL: u32 = 20;

/// First level that spawns two blocks instead of one
pub const UNBREAKABLE_DOUBLE_LEVEL: u32 = 16;

/// Spawn chance at `UNBREAKABLE_FIRST_LEVEL`
pub const UNBREAKABLE_MIN_CHANCE: f64 = 0.3;

/// Spawn chance at `UNBREAKABLE_LAST_LEVEL`
pub const UNBREAKABLE_MAX_CHANCE: f64 = 0.6;

/// Side length of an unbreakable block (2x2)
pub const UNBREAKABLE_BLOCK_SIZE: usize = 2;

/// Placement attempts per unbreakable block
pub const UNBREAKABLE_PLACEMENT_ATTEMPTS: u32 = 200;

/// Default reshuffle attempts per phase
pub const DEFAULT_RESHUFFLE_ATTEMPTS: u32 = 50;

/// Reshuffle attempts per phase used after a player move
pub const PLAYER_MOVE_RESHUFFLE_ATTEMPTS: u32 = 200;

/// Fresh boards tried when reshuffling cannot restore a legal swap
pub const FRESH_BOARD_ATTEMPTS: u32 = 8;

/// The five jelly colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl Color {
    /// Every palette colour in index order
    pub const ALL: [Color; PALETTE_SIZE] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
    ];

    /// Palette index (0..5)
    pub fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Blue => 2,
            Color::Yellow => 3,
            Color::Purple => 4,
        }
    }

    /// Colour at a palette index, `None` past the end of the palette
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse colour from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use jelly_cascade_types::Color;
    ///
    /// assert_eq!(Color::from_str("RED"), Some(Color::Red));
    /// assert_eq!(Color::from_str("orange"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            "yellow" => Some(Color::Yellow),
            "purple" => Some(Color::Purple),
            _ => None,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
        }
    }
}

/// A single board cell
///
/// - **Jelly**: coloured, movable, clearable
/// - **Unbreakable**: pinned obstacle; never moves, never clears, never swaps
/// - **Empty**: transient hole between a clear and the following refill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "color", rename_all = "lowercase")]
pub enum Tile {
    Jelly(Color),
    Unbreakable,
    Empty,
}

impl Tile {
    /// Colour of a jelly, `None` for obstacles and holes
    pub fn color(&self) -> Option<Color> {
        match self {
            Tile::Jelly(color) => Some(*color),
            Tile::Unbreakable | Tile::Empty => None,
        }
    }

    /// Whether the tile may be swapped, shuffled or dropped by gravity
    pub fn is_movable(&self) -> bool {
        match self {
            Tile::Jelly(_) | Tile::Empty => true,
            Tile::Unbreakable => false,
        }
    }

    pub fn is_unbreakable(&self) -> bool {
        matches!(self, Tile::Unbreakable)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }

    /// Compact cell code used by snapshots
    ///
    /// `0` = empty, `1..=5` = jelly colour index + 1, `9` = unbreakable.
    pub fn code(&self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Jelly(color) => color.index() as u8 + 1,
            Tile::Unbreakable => 9,
        }
    }
}

/// Board coordinate; `y = 0` is the top row
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two cells
    pub fn distance(&self, other: Coord) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True when the cells share an edge
    pub fn is_adjacent(&self, other: Coord) -> bool {
        self.distance(other) == 1
    }
}

/// A player swap request: `from` is the grabbed tile, `to` its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swap {
    pub from: Coord,
    pub to: Coord,
}

impl Swap {
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }
}

/// Powerups spawned by long runs and fired in the same step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerupKind {
    /// Clears the anchor's whole row
    Laser,
    /// Clears a square of radius `BOMB_RADIUS` around the anchor
    Bomb,
}

impl PowerupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Laser => "laser",
            PowerupKind::Bomb => "bomb",
        }
    }

    /// Per-tile bonus on top of `BASE_POINTS_PER_TILE`
    pub fn bonus_per_tile(&self) -> u64 {
        match self {
            PowerupKind::Laser => LASER_BONUS_PER_TILE,
            PowerupKind::Bomb => BOMB_BONUS_PER_TILE,
        }
    }
}

/// Grid shape in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}
