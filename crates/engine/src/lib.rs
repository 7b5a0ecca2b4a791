//! Session engine - drives the core rules for one seeded game
//!
//! [`GameState`] is the entry point a renderer or tool talks to:
//!
//! - [`GameState::new`] builds a populated, playable level-1 board from a seed
//! - [`GameState::try_swap`] validates a swap, reverts it when no match forms,
//!   and otherwise returns a [`MoveReport`] describing the whole cascade
//! - [`GameState::grid`] exposes the board read-only for drawing
//!
//! The engine performs no I/O. Everything random draws from the session's
//! single [`RngStream`](jelly_cascade_core::RngStream).

pub mod game_state;
pub mod report;

pub use game_state::{GameState, LevelSetup, SessionConfig, SwapError, SwapOutcome};
pub use report::{GameSnapshot, MoveReport, Recovery, StepReport};
