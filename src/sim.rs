use std::io::Write;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::engine::{GameSnapshot, GameState, MoveReport, Recovery, SwapOutcome};
use crate::types::Swap;

pub const USAGE: &str = "usage: jelly-cascade [--seed <u32>] [--moves <n>] [--json]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub seed: u32,
    pub moves: u32,
    /// Emit one JSON line per move and a final snapshot line
    pub json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            moves: 100,
            json: false,
        }
    }
}

pub fn parse_sim_args(args: &[String]) -> Result<SimConfig> {
    let mut config = SimConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("sim: missing value for --seed"))?;
                config.seed = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("sim: invalid --seed value: {}", v))?;
            }
            "--moves" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("sim: missing value for --moves"))?;
                config.moves = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("sim: invalid --moves value: {}", v))?;
            }
            "--json" => config.json = true,
            other => {
                return Err(anyhow!("sim: unknown argument: {}\n{}", other, USAGE));
            }
        }
        i += 1;
    }
    Ok(config)
}

#[derive(Debug, Serialize)]
struct MoveLine<'a> {
    #[serde(rename = "move")]
    index: u32,
    swap: Swap,
    report: &'a MoveReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimSummary {
    pub moves_played: u32,
    pub reshuffles: u32,
    pub fresh_boards: u32,
    /// Play stopped early because no legal swap was left
    pub stalled: bool,
    pub snapshot: GameSnapshot,
}

/// Play the first legal swap `config.moves` times and report each move to `out`.
pub fn run_sim<W: Write>(config: &SimConfig, out: &mut W) -> Result<SimSummary> {
    let mut game = GameState::new(config.seed);
    let mut moves_played = 0;
    let mut reshuffles = 0;
    let mut fresh_boards = 0;
    let mut stalled = false;

    for index in 0..config.moves {
        let Some(swap) = game.hint() else {
            eprintln!("[sim] no legal swap left after {} moves", moves_played);
            stalled = true;
            break;
        };

        let report = match game.try_swap(swap.from, swap.to)? {
            SwapOutcome::Resolved(report) => report,
            SwapOutcome::Rejected => {
                return Err(anyhow!("sim: hinted swap {:?} was rejected", swap));
            }
        };
        moves_played += 1;

        if report.level_changed {
            eprintln!(
                "[sim] level {} reached at score {} (grid rebuilt: {}, obstacles: {})",
                report.level, report.score, report.grid_rebuilt, report.obstacles_placed
            );
        }
        match report.recovery {
            Recovery::NotNeeded => {}
            Recovery::Reshuffled => {
                reshuffles += 1;
                eprintln!("[sim] move {}: board reshuffled", index);
            }
            Recovery::FreshBoard => {
                fresh_boards += 1;
                eprintln!("[sim] move {}: reshuffle failed, fresh board", index);
            }
            Recovery::Exhausted => {
                eprintln!("[sim] move {}: no playable board found", index);
            }
        }
        if game.take_pending_bonus() {
            eprintln!("[sim] move {}: bonus granted", index);
        }

        if config.json {
            let line = MoveLine {
                index,
                swap,
                report: &report,
            };
            serde_json::to_writer(&mut *out, &line)?;
            out.write_all(b"\n")?;
        }
    }

    let summary = SimSummary {
        moves_played,
        reshuffles,
        fresh_boards,
        stalled,
        snapshot: game.snapshot(),
    };

    if config.json {
        serde_json::to_writer(&mut *out, &summary)?;
        out.write_all(b"\n")?;
    } else {
        writeln!(
            out,
            "seed {}: {} moves, score {}, level {}, reshuffles {}, board {:016x}",
            config.seed,
            summary.moves_played,
            summary.snapshot.score,
            summary.snapshot.level,
            summary.reshuffles,
            summary.snapshot.grid.board_hash
        )?;
    }
    out.flush()?;

    Ok(summary)
}
