//! Headless soak driver.
//!
//! Plays one seeded run with a scripted player that lights a flare near
//! the squad every couple of seconds and buys more when it can, then
//! prints the outcome and the leaderboard as JSON.
//!
//! ```text
//! nightwatch-soak [SEED] [FRAMES] [CONFIG.json]
//! ```

use std::env;
use std::fs;

use anyhow::{Context, Result};
use glam::Vec2;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nightwatch_core::entity::ConsumableKind;
use nightwatch_core::gloom::Rect;
use nightwatch_core::{FrameInput, GameConfig, GameScreen, Leaderboard, Simulation};

const DT: f32 = 1.0 / 60.0;
const FLARE_EVERY: u64 = 120;

fn main() -> Result<()> {
    init_tracing();

    let mut args = env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse().with_context(|| format!("invalid seed {arg:?}"))?,
        None => 1,
    };
    let frames: u64 = match args.next() {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid frame count {arg:?}"))?,
        None => 60 * 60 * 5,
    };
    let config = match args.next() {
        Some(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            GameConfig::from_json(&json).with_context(|| format!("loading {path}"))?
        }
        None => GameConfig::default(),
    };

    let arena = Rect::new(0.0, 36.0, 1280.0, 576.0);
    let mut sim = Simulation::new(config, arena, seed).context("creating session")?;
    sim.open_setup()?;
    let squad = sim.place_soldiers_randomly(sim.config().setup.max_soldiers)?;
    sim.start_run()?;
    info!(seed, frames, soldiers = squad.len(), "soak started");

    for n in 0..frames {
        let mut input = FrameInput::idle(DT);
        if n % FLARE_EVERY == 0 {
            if let Some(soldier) = sim.arena().soldiers().values().next() {
                let offset = Vec2::from_angle(n as f32 * 0.7) * 150.0;
                input = input.with_click(soldier.position + offset);
            }
        }
        if sim.inventory().count(ConsumableKind::Flare) == 0 {
            input = input.with_buy(ConsumableKind::Flare);
        }
        sim.step(&input);
        sim.drain_events();
        if sim.screen() != GameScreen::Playing {
            break;
        }
    }

    let Some(outcome) = sim.outcome() else {
        warn!(frame = sim.frame(), "run still going after the frame limit");
        println!("{sim:#?}");
        return Ok(());
    };
    info!(
        victory = outcome.victory,
        score = outcome.final_score,
        frames = sim.frame(),
        "soak finished"
    );

    let mut board = Leaderboard::new();
    sim.finish_run(&format!("seed{seed}"), &mut board)?;
    println!("{}", board.to_json()?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
