use anyhow::Result;
use engine_core::registry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

mod config;
mod policy;
mod registry_init;
mod session;

use crate::config::Config;
use crate::session::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .init();

    let registry = registry::global();
    registry_init::initialize_registry(registry);

    if config.list {
        for env_id in registry.list() {
            if let Some(game) = registry.create(&env_id, 0) {
                let caps = game.capabilities();
                let timing = caps
                    .tick_interval
                    .map_or_else(|| "untimed".to_string(), |interval| format!("tick {:?}", interval));
                println!(
                    "{:<12} {}x{} {} inputs: {}",
                    env_id,
                    caps.board.rows,
                    caps.board.cols,
                    timing,
                    caps.inputs.join(", ")
                );
            }
        }
        return Ok(());
    }

    let base_seed = config.seed.unwrap_or_else(rand::random);
    info!(env_id = %config.env_id, base_seed, episodes = config.episodes, "starting launcher");

    // Setup graceful shutdown
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);
    let shutdown_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received, stopping launcher...");
                shutdown_flag.store(true, Ordering::Relaxed);
            }
            Err(e) => warn!("Failed to listen for ctrl+c: {}", e),
        }
    });

    let run_result = run(&config, registry, base_seed, &shutdown).await;
    shutdown_handle.abort();

    match run_result {
        Ok(()) => {
            info!("Launcher finished");
            Ok(())
        }
        Err(e) => {
            error!("Launcher failed: {}", e);
            Err(e)
        }
    }
}

async fn run(
    config: &Config,
    registry: &engine_core::Registry,
    base_seed: u64,
    shutdown: &Arc<AtomicBool>,
) -> Result<()> {
    let mut session = Session::new(registry, config, base_seed, Arc::clone(shutdown))?;

    for episode in 0..config.episodes {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        let seed = base_seed.wrapping_add(u64::from(episode));
        let summary = session.run_episode(seed).await?;
        println!("{}", session.snapshot());
        println!(
            "episode {} ({}, {} seed {}): steps={} ticks={} rejected={} score={} status={:?} stop={:?}",
            episode + 1,
            summary.episode_id,
            summary.env_id,
            summary.seed,
            summary.steps,
            summary.ticks,
            summary.rejected,
            summary.score,
            summary.status,
            summary.stop
        );
    }

    Ok(())
}
