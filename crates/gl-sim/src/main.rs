//! Gem Loop headless simulator
//!
//! Usage:
//!   gl-sim --rounds 50 --seed 7          - Play 50 rounds reproducibly
//!   gl-sim --handheld --width 390 --height 844
//!                                        - Portrait handheld board
//!   gl-sim --json                        - Print the final snapshot as JSON
//!
//! Set `RUST_LOG=info` (or `debug`) to follow each spin.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::prelude::*;
use rand::rngs::StdRng;

use gl_loop::{
    EngineConfig, GemLoopEngine, JsonFileStore, Rejection, RoundOutcome, StdRandom, Viewport,
    format_coins,
};

/// Frames fed after the longest possible spin before giving up
const LANDING_GRACE_FRAMES: u64 = 600;

#[derive(Parser, Debug)]
#[command(name = "gl-sim", about = "Gem Loop headless simulator")]
struct Cli {
    /// Rounds to play (stops early on game over)
    #[arg(short, long, default_value_t = 20)]
    rounds: u32,

    /// Seed for spin draws and bet placement
    #[arg(short, long)]
    seed: Option<u64>,

    /// Distinct tiles to bet on each round
    #[arg(long, default_value_t = 2)]
    tiles: usize,

    /// Units per chosen tile
    #[arg(long, default_value_t = 1)]
    units: u32,

    /// Viewport width
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Coarse-pointer (touch) viewport
    #[arg(long)]
    handheld: bool,

    /// Synthetic frame length (ms)
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// Spin timing scale (2.0 = twice as fast)
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Persist the high score to this JSON file
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default)]
struct Tally {
    rounds: u32,
    wins: u32,
    best_payout: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if !(cli.frame_ms > 0.0) {
        bail!("--frame-ms must be positive");
    }
    if !(cli.speed > 0.0) {
        bail!("--speed must be positive");
    }

    let mut config = EngineConfig::default();
    config.timing = config.timing.scaled(1.0 / cli.speed);

    let viewport = if cli.handheld {
        Viewport::touch(cli.width, cli.height)
    } else {
        Viewport::desktop(cli.width, cli.height)
    };

    let (spin_rng, mut bet_rng) = match cli.seed {
        Some(seed) => (
            StdRandom::seeded(seed),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        ),
        None => (StdRandom::new(), StdRng::from_os_rng()),
    };

    let max_frames = (config.timing.max_duration_ms() / cli.frame_ms).ceil() as u64
        + LANDING_GRACE_FRAMES;

    let mut engine = GemLoopEngine::with_config(config, viewport)
        .context("invalid engine configuration")?
        .with_random(spin_rng);
    if let Some(path) = &cli.high_score_file {
        engine = engine.with_store(JsonFileStore::new(path.clone()));
    }

    log::info!(
        "Simulating {} rounds on a {}-tile ring ({}x{} board)",
        cli.rounds,
        engine.ring().len(),
        engine.ring().layout().size.width,
        engine.ring().layout().size.height
    );

    let mut tally = Tally::default();
    for round in 1..=cli.rounds {
        if engine.is_game_over() {
            log::info!("Game over before round {}", round);
            break;
        }

        place_round_bets(&mut engine, &mut bet_rng, cli.tiles, cli.units)?;
        if engine.pending_bet() == 0 {
            log::info!("No affordable bet before round {}", round);
            break;
        }

        engine
            .press_start()
            .with_context(|| format!("round {} failed to start", round))?;
        let outcome = run_spin(&mut engine, cli.frame_ms, max_frames)
            .with_context(|| format!("round {} never landed", round))?;

        tally.rounds += 1;
        if outcome.is_win {
            tally.wins += 1;
            tally.best_payout = tally.best_payout.max(outcome.payout);
        }
        log::info!("Round {}: {}", round, engine.status_message());
    }

    if cli.json {
        println!("{}", engine.snapshot().to_json_pretty());
    } else {
        print_summary(&engine, &tally);
    }
    Ok(())
}

/// Clear the ledger and bet on `tiles` distinct random tiles
fn place_round_bets(
    engine: &mut GemLoopEngine,
    rng: &mut StdRng,
    tiles: usize,
    units: u32,
) -> Result<()> {
    engine.clear_bets().context("clearing bets")?;

    let ring_len = engine.ring().len();
    let picks = rand::seq::index::sample(rng, ring_len, tiles.min(ring_len));
    for tile in picks.iter() {
        for _ in 0..units {
            match engine.place_bet(tile) {
                Ok(_) => {}
                Err(Rejection::InsufficientFunds { .. }) => return Ok(()),
                Err(e) => return Err(e).context("placing bet"),
            }
        }
    }
    Ok(())
}

/// Feed fixed frames until the spin lands
fn run_spin(engine: &mut GemLoopEngine, frame_ms: f64, max_frames: u64) -> Result<RoundOutcome> {
    for _ in 0..max_frames {
        if let Some(outcome) = engine.advance(frame_ms) {
            return Ok(outcome);
        }
    }
    bail!("spin still running after {} frames", max_frames)
}

fn print_summary(engine: &GemLoopEngine, tally: &Tally) {
    let session = engine.session();
    println!("Rounds played : {}", tally.rounds);
    println!("Wins          : {}", tally.wins);
    println!("Best payout   : {}", format_coins(tally.best_payout));
    println!("Final coins   : {}", format_coins(session.coins));
    println!("Score         : {}", session.score);
    println!("High score    : {}", session.high_score);
    println!("Status        : {}", engine.status_message());
}
