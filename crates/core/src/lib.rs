//! Core simulation module - pure, deterministic, and testable
//!
//! This crate contains the board rules of the tile-matching simulation. It
//! has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical boards, cascades and scores
//! - **Testable**: Detector and resolver take the match finder as a parameter
//! - **Portable**: Can run in any environment (renderer, headless, benches)
//!
//! # Module Structure
//!
//! - [`grid`]: The board, segment-aware gravity and refill
//! - [`matcher`]: Line and plus detection, reward policy
//! - [`resolver`]: Single resolution step and the cascade loop
//! - [`scoring`]: Points per event with chain scaling
//! - [`deadlock`]: Legal-swap search and in-place reshuffle
//! - [`level`]: Score curve, grid shape per level, obstacle spawning
//! - [`rng`]: Seeded mulberry32 stream shared by a grid and its clones
//! - [`snapshot`]: Plain-data board copies with a stable hash
//!
//! # Pipeline
//!
//! A swap is kept only if the detector then finds a match. The resolver clears
//! the matches, fires any spawned laser or bomb, drops and refills, and loops
//! until the board is stable. Afterwards the board is checked for a legal
//! swap and reshuffled if none exists.
//!
//! # Example
//!
//! ```
//! use jelly_cascade_core::{find_matches, resolve_all, Grid, ResolveContext, RngStream};
//! use jelly_cascade_core::types::{Color, Tile};
//!
//! let rng = RngStream::new(7);
//! let mut grid = Grid::new(12, 10, rng);
//! grid.populate(true);
//! assert!(find_matches(&grid).is_empty());
//!
//! for x in 0..3 {
//!     grid.set(x, 9, Tile::Jelly(Color::Red)).unwrap();
//! }
//! let outcome = resolve_all(&grid, find_matches, &mut ResolveContext::default());
//! assert!(outcome.chain_count >= 1);
//! assert!(outcome.total_score >= 30);
//! ```

pub mod deadlock;
pub mod grid;
pub mod level;
pub mod matcher;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use jelly_cascade_types as types;

// Re-export commonly used types for convenience
pub use deadlock::{find_first_legal_swap, has_any_legal_swap, reshuffle_in_place, ReshuffleOptions};
pub use grid::{Grid, GridError};
pub use level::{
    desired_grid_size_for_level, maybe_spawn_unbreakables, score_to_level, threshold_for_level,
};
pub use matcher::{find_matches, powerup_for_match, Axis, Match, MatchShape, Reward};
pub use resolver::{resolve_all, resolve_step, CascadeOutcome, ResolveContext, SpawnedPowerup, StepResult};
pub use rng::{RngStream, SimpleRng};
pub use scoring::{combo_multiplier, score_batch, score_event, ScoreEvent};
pub use snapshot::GridSnapshot;
