//! Scoring module - points for clears, powerup blasts and bonus signals
//!
//! Scoring is a pure function of one event. Tile events scale with the chain
//! index as `1 + 0.5 * chain_index` and round half up; bonus events are flat.
//! A batch is scored as the plain sum of its events, with no interaction
//! between them.
//!
//! Note that the cascade loop in [`crate::resolver`] multiplies each step's
//! total by a separate integer combo factor on top of this.

use serde::{Deserialize, Serialize};

use crate::types::{PowerupKind, BASE_POINTS_PER_TILE, BONUS_GRANT_POINTS, BONUS_USE_POINTS};

/// A scoreable occurrence during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScoreEvent {
    /// Tiles cleared by a match
    Clear { tiles: u32, chain_index: u32 },
    /// Tiles cleared by a detonating powerup
    Powerup {
        kind: PowerupKind,
        tiles: u32,
        chain_index: u32,
    },
    /// A plus match granted the one-shot bonus
    BonusGranted,
    /// The one-shot bonus was spent on the given row
    BonusUsed { row: u32 },
}

/// Chain multiplier `1 + 0.5 * chain_index`, kept as the exact ratio
/// `(2 + chain_index) / 2` so rounding is done on integers.
fn chain_scaled(points: u64, chain_index: u32) -> u64 {
    let doubled = points.saturating_mul(2 + u64::from(chain_index));
    // round half up
    doubled.saturating_add(1) / 2
}

/// Score a single event
pub fn score_event(event: &ScoreEvent) -> u64 {
    match *event {
        ScoreEvent::Clear { tiles, chain_index } => {
            chain_scaled(u64::from(tiles) * BASE_POINTS_PER_TILE, chain_index)
        }
        ScoreEvent::Powerup {
            kind,
            tiles,
            chain_index,
        } => chain_scaled(
            u64::from(tiles) * (BASE_POINTS_PER_TILE + kind.bonus_per_tile()),
            chain_index,
        ),
        ScoreEvent::BonusGranted => BONUS_GRANT_POINTS,
        ScoreEvent::BonusUsed { .. } => BONUS_USE_POINTS,
    }
}

/// Score an ordered batch of events
pub fn score_batch(events: &[ScoreEvent]) -> u64 {
    events
        .iter()
        .fold(0u64, |acc, e| acc.saturating_add(score_event(e)))
}

/// Integer combo multiplier for the cascade step at `cascade_index`
pub fn combo_multiplier(cascade_index: u32) -> u64 {
    u64::from(cascade_index).saturating_add(1).max(1)
}
