//! Match detection - runs of three or more same-coloured jellies
//!
//! Rows are scanned left to right, then columns top to bottom. Obstacles and
//! holes break a run. Crossing horizontal and vertical runs of one colour are
//! merged into a plus when they meet at a cell strictly inside both runs.
//!
//! Detection is a pure function of the grid contents: the same board always
//! yields the same matches in the same order.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::{
    Color, Coord, PowerupKind, Tile, BOMB_RUN_LENGTH, LASER_RUN_LENGTH, MIN_RUN_LENGTH,
};

/// Orientation of a straight run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Shape of a detected match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchShape {
    /// A single straight run
    Line(Axis),
    /// A horizontal and a vertical run crossing at `center`
    Plus { center: Coord },
}

/// A clearable shape found on the board
///
/// For a line, `cells` are ordered along the run. For a plus, `cells` hold the
/// horizontal run followed by the vertical run without repeating the center.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub shape: MatchShape,
    pub color: Color,
    pub cells: Vec<Coord>,
}

impl Match {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_plus(&self) -> bool {
        matches!(self.shape, MatchShape::Plus { .. })
    }

    pub fn center(&self) -> Option<Coord> {
        match self.shape {
            MatchShape::Plus { center } => Some(center),
            MatchShape::Line(_) => None,
        }
    }

    pub fn axis(&self) -> Option<Axis> {
        match self.shape {
            MatchShape::Line(axis) => Some(axis),
            MatchShape::Plus { .. } => None,
        }
    }

    /// Position of `at` within the run, `None` if not covered
    fn position(&self, at: Coord) -> Option<usize> {
        self.cells.iter().position(|c| *c == at)
    }

    /// True when `at` is covered by the run and is not one of its ends
    fn is_interior(&self, at: Coord) -> bool {
        self.position(at)
            .is_some_and(|i| i > 0 && i + 1 < self.cells.len())
    }
}

/// What a match awards when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reward {
    /// A physical powerup placed at the anchor and fired immediately
    Powerup(PowerupKind),
    /// The one-shot bonus signal granted by a plus
    Bonus,
}

/// Reward policy: plus grants the bonus, 5+ spawns a bomb, exactly 4 a laser
pub fn powerup_for_match(m: &Match) -> Option<Reward> {
    if m.is_plus() {
        return Some(Reward::Bonus);
    }
    match m.len() {
        n if n >= BOMB_RUN_LENGTH => Some(Reward::Powerup(PowerupKind::Bomb)),
        LASER_RUN_LENGTH => Some(Reward::Powerup(PowerupKind::Laser)),
        _ => None,
    }
}

/// Find every match on the board
pub fn find_matches(grid: &Grid) -> Vec<Match> {
    let mut lines = Vec::new();
    scan_runs(grid, Axis::Horizontal, &mut lines);
    scan_runs(grid, Axis::Vertical, &mut lines);
    merge_crossings(lines)
}

/// Collect all qualifying straight runs along one axis
fn scan_runs(grid: &Grid, axis: Axis, out: &mut Vec<Match>) {
    let (outer, inner) = match axis {
        Axis::Horizontal => (grid.height(), grid.width()),
        Axis::Vertical => (grid.width(), grid.height()),
    };
    let at = |line: usize, pos: usize| match axis {
        Axis::Horizontal => Coord::new(pos, line),
        Axis::Vertical => Coord::new(line, pos),
    };

    for line in 0..outer {
        let mut pos = 0;
        while pos < inner {
            let color = match grid.tile(at(line, pos)) {
                Tile::Jelly(color) => color,
                Tile::Unbreakable | Tile::Empty => {
                    pos += 1;
                    continue;
                }
            };

            let mut run = 1;
            while pos + run < inner && grid.tile(at(line, pos + run)) == Tile::Jelly(color) {
                run += 1;
            }

            if run >= MIN_RUN_LENGTH {
                out.push(Match {
                    shape: MatchShape::Line(axis),
                    color,
                    cells: (pos..pos + run).map(|p| at(line, p)).collect(),
                });
            }
            pos += run;
        }
    }
}

/// Merge same-coloured horizontal/vertical pairs crossing at an interior cell.
///
/// Pairs are tried in detection order; a run joins at most one plus. Pluses
/// come first in the result, followed by the unmerged runs in detection order.
fn merge_crossings(lines: Vec<Match>) -> Vec<Match> {
    let mut used = vec![false; lines.len()];
    let mut result = Vec::new();

    for i in 0..lines.len() {
        if used[i] || lines[i].axis() != Some(Axis::Horizontal) {
            continue;
        }
        for j in 0..lines.len() {
            if used[i] {
                break;
            }
            if used[j] || lines[j].axis() != Some(Axis::Vertical) {
                continue;
            }
            let (h, v) = (&lines[i], &lines[j]);
            if h.color != v.color {
                continue;
            }

            // A row and a column meet in at most one cell.
            let Some(&first) = h.cells.first() else {
                continue;
            };
            let Some(&top) = v.cells.first() else {
                continue;
            };
            let crossing = Coord::new(top.x, first.y);
            if !(h.is_interior(crossing) && v.is_interior(crossing)) {
                continue;
            }

            let mut cells = h.cells.clone();
            cells.extend(v.cells.iter().copied().filter(|c| *c != crossing));
            result.push(Match {
                shape: MatchShape::Plus { center: crossing },
                color: h.color,
                cells,
            });
            used[i] = true;
            used[j] = true;
        }
    }

    result.extend(
        lines
            .into_iter()
            .zip(used)
            .filter(|(_, merged)| !merged)
            .map(|(m, _)| m),
    );
    result
}
