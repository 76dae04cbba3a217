#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a scripted Lane Defence battle headlessly.

mod data;
mod progress;
mod script;

use std::{path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::{Outcome, Settings};
use lane_defence_simulation::Simulation;
use lane_defence_world::World;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{data::DataSet, script::RunConfig};

/// Command-line arguments for the headless battle runner.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", about = "Runs a scripted Lane Defence battle")]
struct CliArgs {
    /// Directory holding `defenders.toml`, `attackers.toml` and `levels/`.
    #[arg(long, value_name = "DIR", default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data"))]
    data_dir: PathBuf,
    /// Level identifier; loads `levels/<LEVEL>.toml`.
    #[arg(long, default_value = "1-1")]
    level: String,
    /// Seed for the battle RNG.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Simulated milliseconds per tick.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    tick_ms: u64,
    /// Simulated seconds after which the run stops without an outcome.
    #[arg(long, value_name = "SECONDS", default_value_t = 300)]
    max_seconds: u64,
    /// File the campaign progress is read from and written back to.
    #[arg(long, value_name = "FILE", default_value = "progress.json")]
    progress: PathBuf,
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> ExitCode {
    init_tracing();
    match run(CliArgs::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "run failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: CliArgs) -> Result<()> {
    let data = DataSet::load(&args.data_dir, &args.level)?;
    let progress = progress::load(&args.progress);
    info!(
        level = %data.level.id,
        seed = args.seed,
        defenders = data.defenders.len(),
        attackers = data.attackers.len(),
        scheduled = data.level.spawn_table.len(),
        "starting battle"
    );

    let world = World::new(
        data.level,
        data.defenders,
        data.attackers,
        progress,
        Settings::default(),
        args.seed,
    );
    let mut simulation = Simulation::new(world);
    let config = RunConfig {
        tick: Duration::from_millis(args.tick_ms),
        limit: Duration::from_secs(args.max_seconds),
    };
    let report = script::run(&mut simulation, &data.script, config)
        .context("battle could not be started")?;

    let elapsed = format!("{:.1}s", report.elapsed.as_secs_f32());
    match report.outcome {
        Some(Outcome::Win) => info!(%elapsed, kills = report.kills, "level cleared"),
        Some(Outcome::Lose { lane }) => info!(%elapsed, lane, "lane breached"),
        None => info!(%elapsed, "time limit reached without an outcome"),
    }
    info!(
        planted = report.planted,
        dropped = report.dropped,
        spawned = report.spawned,
        sun_collected = report.collected,
        sun_left = simulation.snapshot().sun,
        "battle summary"
    );

    progress::save(&args.progress, simulation.world().progress())
        .context("failed to persist progress")?;
    info!(path = %args.progress.display(), "progress saved");
    Ok(())
}
