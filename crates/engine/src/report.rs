//! Move reports and session snapshots handed to renderers and tools

use serde::{Deserialize, Serialize};

use jelly_cascade_core::resolver::{SpawnedPowerup, StepResult};
use jelly_cascade_core::GridSnapshot;
use jelly_cascade_types::Coord;

/// How the board was brought back to a playable state after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Recovery {
    /// A legal swap already existed
    NotNeeded,
    /// Movable tiles were shuffled in place
    Reshuffled,
    /// Reshuffle failed and the board was repopulated
    FreshBoard,
    /// Neither reshuffle nor fresh boards produced a legal swap
    Exhausted,
}

/// One cascade step as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub chain_index: u32,
    /// Matched and blasted cells, row-major
    pub cleared: Vec<Coord>,
    pub matched_tiles: usize,
    pub powerups: Vec<SpawnedPowerup>,
    pub bonuses_granted: u32,
    /// Points for the step after the combo multiplier
    pub score_delta: u64,
}

impl From<&StepResult> for StepReport {
    fn from(step: &StepResult) -> Self {
        Self {
            chain_index: step.chain_index,
            cleared: step.cleared.clone(),
            matched_tiles: step.matched_tiles,
            powerups: step.spawned.clone(),
            bonuses_granted: step.bonuses_granted,
            score_delta: step.score_delta,
        }
    }
}

/// Everything a resolved player move changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub steps: Vec<StepReport>,
    pub chain_count: u32,
    pub score_delta: u64,
    /// Session score after the move
    pub score: u64,
    /// Session level after the move
    pub level: u32,
    pub level_changed: bool,
    /// The board was replaced because the level needs a different shape
    pub grid_rebuilt: bool,
    pub obstacles_placed: usize,
    pub bonus_granted: bool,
    pub recovery: Recovery,
}

impl MoveReport {
    /// Whether the board was reshuffled in place after the cascade
    pub fn reshuffled(&self) -> bool {
        self.recovery == Recovery::Reshuffled
    }
}

/// Plain-data view of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub seed: u32,
    pub score: u64,
    pub level: u32,
    pub pending_bonus: bool,
    pub grid: GridSnapshot,
}
