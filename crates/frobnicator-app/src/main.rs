use std::fs;

use anyhow::Context;
use clap::Parser;

use frobnicator_app::cli::Args;
use frobnicator_app::game_loop::{self, LoopConfig};
use frobnicator_app::logger;
use frobnicator_map::ContentLoader;
use frobnicator_sim::engine::{SimConfig, SimulationEngine};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_level = std::env::var(logger::LOG_ENV).ok();
    logger::init(logger::level_from(args.verbose, env_level.as_deref()))
        .context("failed to install logger")?;

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<SimConfig>(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let loader = match &args.data_dir {
        Some(dir) => ContentLoader::new(dir.clone()),
        None => ContentLoader::from_env(),
    };
    let level = loader
        .load_level(&args.level)
        .with_context(|| format!("failed to load level {}", args.level))?;

    let mut engine = SimulationEngine::new(config, level);
    engine.queue_commands(args.build.iter().map(|order| order.to_command()));

    let summary = game_loop::run(
        &mut engine,
        LoopConfig {
            max_ticks: args.ticks,
            paced: !args.unpaced,
        },
    );
    log::info!(
        "Stopped after {} ticks: {:?}, gold {}, lives {}, wave {}",
        summary.ticks,
        summary.phase,
        summary.gold,
        summary.lives,
        summary.wave
    );
    Ok(())
}
