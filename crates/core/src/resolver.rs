//! Resolver - clears matches, fires powerups, drops and refills, cascades
//!
//! [`resolve_step`] performs one pass on a clone of the input grid:
//!
//! 1. Union every matched cell into a clear set and emit one clear event per
//!    match.
//! 2. Decide rewards: a 4-run spawns a laser, a 5+-run a bomb, a plus fires
//!    the bonus hook instead of spawning anything.
//! 3. Clear the clear set (unbreakables are left alone).
//! 4. Fire each spawned powerup: a laser sweeps its anchor row, a bomb a
//!    square of radius `BOMB_RADIUS` clamped to the grid.
//! 5. Clear the blast cells, again skipping unbreakables.
//! 6. Apply gravity, then refill.
//!
//! [`resolve_all`] repeats steps until the detector finds nothing, scaling each
//! step by the integer combo multiplier. Bonus grants are added unscaled.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::matcher::{powerup_for_match, Match, Reward};
use crate::scoring::{combo_multiplier, score_batch, score_event, ScoreEvent};
use crate::types::{Coord, PowerupKind, Swap, BOMB_RADIUS};

/// Debug-build ceiling on cascade steps; exceeding it means the loop is stuck
pub const DEBUG_CASCADE_CAP: u32 = 10_000;

/// Per-call resolution inputs
///
/// `on_bonus_granted` runs once for every plus match resolved.
#[derive(Debug, Clone)]
pub struct ResolveContext<F = fn()> {
    /// The swap that triggered this resolution, if any
    pub last_swap: Option<Swap>,
    /// Cascade index used for chain-scaled score events
    pub chain_index: u32,
    pub on_bonus_granted: F,
}

fn no_bonus_hook() {}

impl ResolveContext {
    pub fn new(last_swap: Option<Swap>) -> Self {
        Self {
            last_swap,
            chain_index: 0,
            on_bonus_granted: no_bonus_hook,
        }
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<F: FnMut()> ResolveContext<F> {
    /// Replace the bonus hook
    pub fn with_bonus_hook<G: FnMut()>(self, hook: G) -> ResolveContext<G> {
        ResolveContext {
            last_swap: self.last_swap,
            chain_index: self.chain_index,
            on_bonus_granted: hook,
        }
    }
}

/// A powerup spawned and fired during a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedPowerup {
    pub kind: PowerupKind,
    /// Anchor cell the powerup was placed on
    pub at: Coord,
    /// Cells actually cleared by the blast (unbreakables excluded)
    pub affected: Vec<Coord>,
}

/// Outcome of one non-cascading resolution pass
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Board after clearing, blasting, gravity and refill
    pub grid: Grid,
    /// Chain index this step was scored with
    pub chain_index: u32,
    /// Union of matched and blasted cells, sorted row-major
    pub cleared: Vec<Coord>,
    /// Number of distinct cells covered by matches
    pub matched_tiles: usize,
    pub spawned: Vec<SpawnedPowerup>,
    /// Plus matches resolved in this step
    pub bonuses_granted: u32,
    /// Score events in emission order
    pub events: Vec<ScoreEvent>,
    /// Points for the step; [`resolve_all`] applies the combo multiplier to
    /// everything except bonus grants
    pub score_delta: u64,
}

/// Result of a full cascade
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    pub grid: Grid,
    /// Number of steps resolved
    pub chain_count: u32,
    /// Sum of the combo-scaled step deltas
    pub total_score: u64,
    pub steps: Vec<StepResult>,
}

/// Resolve one pass of `matches` against a clone of `grid`
pub fn resolve_step<F: FnMut()>(
    grid: &Grid,
    matches: &[Match],
    ctx: &mut ResolveContext<F>,
) -> StepResult {
    let mut working = grid.clone();
    let chain_index = ctx.chain_index;

    let mut clear_set: BTreeSet<Coord> = BTreeSet::new();
    let mut events = Vec::new();
    let mut pending: Vec<(PowerupKind, Coord)> = Vec::new();
    let mut bonuses_granted = 0u32;

    for m in matches {
        clear_set.extend(m.cells.iter().copied());
        events.push(ScoreEvent::Clear {
            tiles: m.len() as u32,
            chain_index,
        });

        match powerup_for_match(m) {
            Some(Reward::Bonus) => {
                bonuses_granted += 1;
                events.push(ScoreEvent::BonusGranted);
                (ctx.on_bonus_granted)();
            }
            Some(Reward::Powerup(kind)) => {
                pending.push((kind, choose_anchor(m, ctx.last_swap)));
            }
            None => {}
        }
    }
    let matched_tiles = clear_set.len();

    for at in &clear_set {
        working.clear_cell(*at);
    }

    let mut spawned = Vec::with_capacity(pending.len());
    let mut cleared = clear_set;
    for (kind, at) in pending {
        let affected: Vec<Coord> = blast_region(&working, kind, at)
            .into_iter()
            .filter(|c| !working.tile(*c).is_unbreakable())
            .collect();
        events.push(ScoreEvent::Powerup {
            kind,
            tiles: affected.len() as u32,
            chain_index,
        });
        spawned.push(SpawnedPowerup { kind, at, affected });
    }

    for powerup in &spawned {
        for at in &powerup.affected {
            working.clear_cell(*at);
            cleared.insert(*at);
        }
    }

    working.apply_gravity();
    working.refill();

    let score_delta = score_batch(&events);
    StepResult {
        grid: working,
        chain_index,
        cleared: sorted_row_major(cleared),
        matched_tiles,
        spawned,
        bonuses_granted,
        events,
        score_delta,
    }
}

/// Resolve repeatedly until the board holds no matches.
///
/// `find` is the match detector; tests may substitute their own. The
/// triggering swap only steers anchors for the first step.
pub fn resolve_all<M, F>(grid: &Grid, find: M, ctx: &mut ResolveContext<F>) -> CascadeOutcome
where
    M: Fn(&Grid) -> Vec<Match>,
    F: FnMut(),
{
    let mut working = grid.clone();
    let mut cascade_index = 0u32;
    let mut total_score = 0u64;
    let mut steps = Vec::new();
    let trigger = ctx.last_swap;

    loop {
        let matches = find(&working);
        if matches.is_empty() {
            break;
        }
        debug_assert!(
            cascade_index < DEBUG_CASCADE_CAP,
            "cascade did not settle after {DEBUG_CASCADE_CAP} steps"
        );

        ctx.chain_index = cascade_index;
        ctx.last_swap = if cascade_index == 0 { trigger } else { None };

        let mut step = resolve_step(&working, &matches, ctx);
        // Bonus grants stay flat; only clears and blasts take the combo
        let flat = score_event(&ScoreEvent::BonusGranted)
            .saturating_mul(u64::from(step.bonuses_granted));
        step.score_delta = step
            .score_delta
            .saturating_sub(flat)
            .saturating_mul(combo_multiplier(cascade_index))
            .saturating_add(flat);

        total_score = total_score.saturating_add(step.score_delta);
        working = step.grid.clone();
        steps.push(step);
        cascade_index += 1;
    }

    ctx.last_swap = trigger;
    ctx.chain_index = 0;

    CascadeOutcome {
        grid: working,
        chain_count: cascade_index,
        total_score,
        steps,
    }
}

/// Anchor for a spawned powerup: the run cell nearest the swap destination,
/// earliest in run order on ties, else the run's midpoint.
fn choose_anchor(m: &Match, last_swap: Option<Swap>) -> Coord {
    if let Some(center) = m.center() {
        return center;
    }
    if let Some(swap) = last_swap {
        if let Some(nearest) = m.cells.iter().copied().min_by_key(|c| c.distance(swap.to)) {
            return nearest;
        }
    }
    m.cells[m.cells.len() / 2]
}

/// Cells swept by a powerup fired at `at`, before filtering unbreakables
fn blast_region(grid: &Grid, kind: PowerupKind, at: Coord) -> Vec<Coord> {
    match kind {
        PowerupKind::Laser => (0..grid.width()).map(|x| Coord::new(x, at.y)).collect(),
        PowerupKind::Bomb => {
            let x0 = at.x.saturating_sub(BOMB_RADIUS);
            let y0 = at.y.saturating_sub(BOMB_RADIUS);
            let x1 = (at.x + BOMB_RADIUS).min(grid.width() - 1);
            let y1 = (at.y + BOMB_RADIUS).min(grid.height() - 1);
            (y0..=y1)
                .flat_map(|y| (x0..=x1).map(move |x| Coord::new(x, y)))
                .collect()
        }
    }
}

fn sorted_row_major(cells: BTreeSet<Coord>) -> Vec<Coord> {
    let mut out: Vec<Coord> = cells.into_iter().collect();
    out.sort_by_key(|c| (c.y, c.x));
    out
}
