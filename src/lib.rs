//! Jelly Cascade (workspace facade crate).
//!
//! This package exposes `jelly_cascade::{core,engine,types}` while the
//! implementation lives in dedicated crates under `crates/`, plus the
//! headless autoplay driver in [`sim`].

pub mod sim;

pub use jelly_cascade_core as core;
pub use jelly_cascade_engine as engine;
pub use jelly_cascade_types as types;
