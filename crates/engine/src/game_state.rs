//! Game state module - one seeded session
//!
//! Ties the core rules together: the live grid, the session RNG stream, score,
//! level and the pending bonus flag. Score and level only change through
//! [`GameState::resolve_player_move`]; the grid is replaced, never resized,
//! when a level needs a different shape.

use thiserror::Error;

use jelly_cascade_core::{
    desired_grid_size_for_level, find_first_legal_swap, find_matches, has_any_legal_swap,
    maybe_spawn_unbreakables, reshuffle_in_place, resolve_all, score_to_level, CascadeOutcome,
    Grid, GridError, GridSnapshot, ResolveContext, ReshuffleOptions, RngStream,
};
use jelly_cascade_types::{Coord, Swap, Tile, FRESH_BOARD_ATTEMPTS, PLAYER_MOVE_RESHUFFLE_ATTEMPTS};

use crate::report::{GameSnapshot, MoveReport, Recovery, StepReport};

/// Session tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Reshuffle settings used when a board has no legal swap
    pub reshuffle: ReshuffleOptions,
    /// Repopulated boards tried after a failed reshuffle
    pub fresh_board_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reshuffle: ReshuffleOptions {
                max_attempts: PLAYER_MOVE_RESHUFFLE_ATTEMPTS,
                avoid_immediate_matches: true,
            },
            fresh_board_attempts: FRESH_BOARD_ATTEMPTS,
        }
    }
}

/// Rejected swap request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SwapError {
    #[error("swap outside the board: {0}")]
    OutOfBounds(#[from] GridError),
    #[error("cells {from:?} and {to:?} are not adjacent")]
    NotAdjacent { from: Coord, to: Coord },
    #[error("tile at {at:?} cannot be moved")]
    Immovable { at: Coord },
}

/// Result of a well-formed swap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// No match formed; the swap was reverted
    Rejected,
    Resolved(MoveReport),
}

impl SwapOutcome {
    pub fn is_legal(&self) -> bool {
        matches!(self, SwapOutcome::Resolved(_))
    }
}

/// What starting a level did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelSetup {
    pub grid_rebuilt: bool,
    pub obstacles_placed: usize,
}

/// Complete session state
///
/// Cloning forks the RNG stream, so a clone replays the same future as the
/// original without sharing draws with it.
#[derive(Debug)]
pub struct GameState {
    grid: Grid,
    rng: RngStream,
    score: u64,
    level: u32,
    pending_bonus: bool,
    config: SessionConfig,
}

impl Clone for GameState {
    fn clone(&self) -> Self {
        let rng = self.rng.fork();
        let mut grid = self.grid.clone();
        grid.set_rng(rng.clone());
        Self {
            grid,
            rng,
            score: self.score,
            level: self.level,
            pending_bonus: self.pending_bonus,
            config: self.config,
        }
    }
}

impl GameState {
    /// Start a session at level 1 with a populated, playable board
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, SessionConfig::default())
    }

    pub fn with_config(seed: u32, config: SessionConfig) -> Self {
        let rng = RngStream::new(seed);
        let level = 1;
        let size = desired_grid_size_for_level(level);
        let grid = Grid::filled(size.width, size.height, Tile::Empty, rng.clone());

        let mut state = Self {
            grid,
            rng,
            score: 0,
            level,
            pending_bonus: false,
            config,
        };
        state.start_level_setup();
        state.ensure_playable();
        state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable grid access for tests and tools
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn pending_bonus(&self) -> bool {
        self.pending_bonus
    }

    /// Consume the pending bonus flag
    pub fn take_pending_bonus(&mut self) -> bool {
        std::mem::take(&mut self.pending_bonus)
    }

    /// First legal swap on the current board, if any
    pub fn hint(&self) -> Option<Swap> {
        find_first_legal_swap(&self.grid, find_matches)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            seed: self.seed(),
            score: self.score,
            level: self.level,
            pending_bonus: self.pending_bonus,
            grid: GridSnapshot::from(&self.grid),
        }
    }

    /// Swap two adjacent tiles and resolve the move if it forms a match.
    ///
    /// A swap that forms no match is reverted and reported as
    /// [`SwapOutcome::Rejected`]; malformed requests return an error and leave
    /// the board untouched.
    pub fn try_swap(&mut self, from: Coord, to: Coord) -> Result<SwapOutcome, SwapError> {
        let a = self.grid.get(from.x, from.y)?;
        let b = self.grid.get(to.x, to.y)?;
        if !from.is_adjacent(to) {
            return Err(SwapError::NotAdjacent { from, to });
        }
        if !a.is_movable() {
            return Err(SwapError::Immovable { at: from });
        }
        if !b.is_movable() {
            return Err(SwapError::Immovable { at: to });
        }

        self.grid.swap(from, to)?;
        if find_matches(&self.grid).is_empty() {
            self.grid.swap(from, to)?;
            return Ok(SwapOutcome::Rejected);
        }

        Ok(SwapOutcome::Resolved(
            self.resolve_player_move(Some(Swap::new(from, to))),
        ))
    }

    /// Cascade the current board, then apply score, level and deadlock updates
    pub fn resolve_player_move(&mut self, trigger: Option<Swap>) -> MoveReport {
        let mut bonus_granted = false;
        let CascadeOutcome {
            grid,
            chain_count,
            total_score,
            steps,
        } = {
            let mut ctx = ResolveContext::new(trigger).with_bonus_hook(|| bonus_granted = true);
            resolve_all(&self.grid, find_matches, &mut ctx)
        };
        self.grid = grid;
        if bonus_granted {
            self.pending_bonus = true;
        }

        self.score = self.score.saturating_add(total_score);
        let setup = self.advance_to_level(score_to_level(self.score));
        let recovery = self.ensure_playable();

        MoveReport {
            steps: steps.iter().map(StepReport::from).collect(),
            chain_count,
            score_delta: total_score,
            score: self.score,
            level: self.level,
            level_changed: setup.is_some(),
            grid_rebuilt: setup.is_some_and(|s| s.grid_rebuilt),
            obstacles_placed: setup.map_or(0, |s| s.obstacles_placed),
            bonus_granted,
            recovery,
        }
    }

    /// Move to `level` if it is above the current one and set the board up
    /// for it. Levels never go down.
    pub fn advance_to_level(&mut self, level: u32) -> Option<LevelSetup> {
        if level <= self.level {
            return None;
        }
        self.level = level;
        Some(self.start_level_setup())
    }

    /// Replace the grid if the current level needs a different shape
    pub fn ensure_grid_shape_for_level(&mut self) -> bool {
        let size = desired_grid_size_for_level(self.level);
        if self.grid.size() == size {
            return false;
        }
        self.grid = Grid::filled(size.width, size.height, Tile::Empty, self.rng.clone());
        true
    }

    /// Shape the grid, repopulate it without ready-made matches and roll for
    /// obstacles. Existing obstacles on a kept grid stay where they are.
    pub fn start_level_setup(&mut self) -> LevelSetup {
        let grid_rebuilt = self.ensure_grid_shape_for_level();
        self.grid.populate(true);
        let obstacles_placed = maybe_spawn_unbreakables(&mut self.grid, &self.rng, self.level);
        LevelSetup {
            grid_rebuilt,
            obstacles_placed,
        }
    }

    /// Make sure the board has a legal swap.
    ///
    /// Reshuffles first; if that fails, repopulates the board a bounded
    /// number of times.
    pub fn ensure_playable(&mut self) -> Recovery {
        if has_any_legal_swap(&self.grid, find_matches) {
            return Recovery::NotNeeded;
        }
        if reshuffle_in_place(
            &mut self.grid,
            &self.rng,
            find_matches,
            self.config.reshuffle,
        ) {
            return Recovery::Reshuffled;
        }
        for _ in 0..self.config.fresh_board_attempts {
            self.grid.populate(true);
            if has_any_legal_swap(&self.grid, find_matches) {
                return Recovery::FreshBoard;
            }
        }
        Recovery::Exhausted
    }
}
