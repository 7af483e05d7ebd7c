//! Simulate command implementation.
//!
//! Runs an in-memory game: simulated players claim random cells in
//! parallel, then one evaluation pass resolves the board. The state file
//! is not touched.

// Bot coordinates come from truncated RNG output
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use super::output::{format_report_text, format_standings_text, render_grid_ascii, to_json};
use super::{CliError, OutputFormat};
use enclave::{Coord, Engine, EngineConfig, EvaluationReport, GameError, PlayerId, Range, Role, Standing};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

/// Largest grid the text output will draw.
const MAX_DRAWN_SIDE: i32 = 80;

/// Per-bot xorshift64 stream, reproducible from the run seed.
#[derive(Debug, Clone, Copy)]
struct BotRng(u64);

impl BotRng {
    /// Derive the stream for `player` from the run seed.
    fn for_player(seed: u64, player: PlayerId) -> Self {
        let mixed = seed ^ u64::from(player).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        // xorshift is stuck at zero
        Self(if mixed == 0 { 0x5555_5555_5555_5555 } else { mixed })
    }

    /// A value in `[0, bound)`; zero for a non-positive bound.
    fn below(&mut self, bound: i32) -> i32 {
        if bound <= 0 {
            return 0;
        }
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x % u64::from(bound.unsigned_abs())) as i32
    }
}

/// Placement outcome counts for one simulated player.
#[derive(Debug, Clone, Copy, Default, Serialize)]
struct PlacementTally {
    placed: u64,
    occupied: u64,
}

impl PlacementTally {
    fn merge(mut self, other: Self) -> Self {
        self.placed += other.placed;
        self.occupied += other.occupied;
        self
    }
}

/// JSON-serializable simulation result.
#[derive(Debug, Serialize)]
struct SimulationResult<'a> {
    seed: u64,
    players: u32,
    size: i32,
    tally: PlacementTally,
    report: &'a EvaluationReport,
    standings: &'a [Standing],
}

/// Claim random cells until the attempts or the points run out.
fn play(engine: &Engine, player: PlayerId, size: i32, attempts: u32, seed: u64) -> PlacementTally {
    let mut rng = BotRng::for_player(seed, player);
    let mut tally = PlacementTally::default();
    for _ in 0..attempts {
        let coord = Coord::new(rng.below(size), rng.below(size));
        match engine.place_tile(player, coord) {
            Ok(_) => tally.placed += 1,
            Err(GameError::TileOccupied(_)) => tally.occupied += 1,
            Err(_) => break,
        }
    }
    tally
}

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the arguments describe an invalid game.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    ctx: &super::Context,
    players: u32,
    size: i32,
    placements: u32,
    seed: Option<u64>,
    threads: Option<usize>,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    if players == 0 || size <= 0 {
        return Err(CliError::new("Need at least one player and a positive grid size"));
    }

    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    });

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let config = EngineConfig {
        starting_points: placements,
        ..ctx.engine_config()?
    };
    let engine = Engine::new(config);
    let admin = engine.register_player_with_role("simulator", Role::Admin)?.id;
    engine.expand_range(admin, Range::new(0, size, 0, size)?)?;
    let ids = (1..=players)
        .map(|i| engine.register_player_with_role(&format!("bot-{i}"), Role::User).map(|p| p.id))
        .collect::<Result<Vec<_>, _>>()?;

    let pb = if progress {
        let pb = ProgressBar::new(u64::from(players));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} players")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let tally = ids
        .par_iter()
        .map(|&id| {
            let tally = play(&engine, id, size, placements, seed);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            tally
        })
        .reduce(PlacementTally::default, PlacementTally::merge);
    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let placing = start.elapsed();

    let report = engine.run_evaluation(admin)?;
    let standings = engine.standings();

    match format {
        OutputFormat::Text => {
            println!(
                "Seed {seed}: {} placed, {} collisions in {:.2}s",
                tally.placed,
                tally.occupied,
                placing.as_secs_f64()
            );
            print!("{}", format_report_text(&report));
            println!();
            print!("{}", format_standings_text(&standings));
            if size <= MAX_DRAWN_SIDE
                && let Some(grid) = engine.grid_snapshot()
            {
                println!();
                print!("{}", render_grid_ascii(&grid));
            }
        }
        OutputFormat::Json => {
            let result = SimulationResult {
                seed,
                players,
                size,
                tally,
                report: &report,
                standings: &standings,
            };
            println!("{}", to_json(&result)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        let mut a = BotRng::for_player(7, 3);
        let mut b = BotRng::for_player(7, 3);
        for _ in 0..100 {
            assert_eq!(a.below(50), b.below(50));
        }
    }

    #[test]
    fn test_rng_range() {
        let mut rng = BotRng::for_player(0, 0);
        for _ in 0..1000 {
            let v = rng.below(13);
            assert!((0..13).contains(&v));
        }
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn test_play_spends_budget() {
        let config = EngineConfig {
            starting_points: 5,
            ..EngineConfig::default()
        };
        let engine = Engine::new(config);
        let admin = engine.register_player_with_role("admin", Role::Admin).unwrap().id;
        engine.expand_range(admin, Range::new(0, 4, 0, 4).unwrap()).unwrap();
        let bot = engine.register_player("bot").unwrap().id;

        let tally = play(&engine, bot, 4, 50, 3);
        assert_eq!(tally.placed, 5);
        assert_eq!(engine.player(bot).unwrap().points, 0);
    }
}
