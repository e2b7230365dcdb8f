/*
 * Schools Of Fish
 *
 * Several schools of boids share one tank. Every boid follows three local
 * rules, tuned per school:
 * 1. Cohesion: Steer towards the average position of neighbors
 * 2. Separation: Avoid crowding neighbors
 * 3. Alignment: Steer along the average heading of neighbors
 * Friendliness decides how much a school cares about the others.
 *
 * The control panel adjusts every school's parameters in real time.
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use schools::app;
use schools::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "schools", about = "Multi-group boid flocking simulation")]
struct Cli {
    /// JSON configuration file; the built-in scene is used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for boid placement, overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many ticks without a window and log a summary.
    #[arg(long, value_name = "TICKS")]
    headless: Option<u64>,

    /// Tick length in seconds for headless runs.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    if cli.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    if let Some(ticks) = cli.headless {
        app::run_headless(&config, ticks, cli.dt);
        return Ok(());
    }

    info!(title = %config.window.title, "opening window");
    app::run(config);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
