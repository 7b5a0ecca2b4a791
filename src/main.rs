//! Headless autoplay runner (default binary).
//!
//! Plays the first legal swap each move from a fixed seed and prints either a
//! one-line summary or JSON move reports on stdout. Progress notes go to
//! stderr.

use std::io;

use anyhow::Result;

use jelly_cascade::sim::{parse_sim_args, run_sim};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_sim_args(&args)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = run_sim(&config, &mut out)?;

    if summary.stalled {
        eprintln!("[sim] stopped early at move {}", summary.moves_played);
    }
    Ok(())
}
