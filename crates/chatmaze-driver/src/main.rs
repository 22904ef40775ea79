use std::time::Duration;

use anyhow::Context;
use tokio::time::{Instant, MissedTickBehavior};

use chatmaze_driver::config::DriverConfig;
use chatmaze_driver::{Driver, ScriptedChat, clock, init_tracing, render};
use chatmaze_hunt::Simulation;
use chatmaze_store::JsonFileStore;

fn interval(ms: u64) -> tokio::time::Interval {
    let mut timer = tokio::time::interval(Duration::from_millis(ms));
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, origin) = DriverConfig::load();
    init_tracing(config.log_format);
    tracing::info!(config = %origin, "Chat maze driver starting");
    config.validate().context("invalid driver configuration")?;

    let start = clock::now_ms();
    let source = match &config.script_path {
        Some(path) => ScriptedChat::from_path(path, start)
            .with_context(|| format!("failed to load chat script {path}"))?,
        None => {
            tracing::warn!("No chat script configured, the board will stay idle");
            ScriptedChat::new(Vec::new(), start)
        },
    };
    tracing::info!(lines = source.len(), "Chat source ready");

    let hunt = config.hunt_config();
    tracing::info!(
        rows = hunt.maze_rows,
        columns = hunt.maze_columns,
        seed = ?hunt.seed,
        "Game configured"
    );
    let store = JsonFileStore::new(&config.store_path);
    let mut driver = Driver::new(Simulation::new(hunt), source, store);
    driver.restore();

    let mut tick = interval(config.tick_ms);
    let mut poll = interval(config.poll_ms);
    let mut save = interval(config.save_interval_ms);
    let mut draw = interval(config.render_ms.max(1));
    let deadline = config
        .run_for_ms
        .map(|ms| Instant::now() + Duration::from_millis(ms));
    let stop = async move {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(stop);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                driver.tick(clock::now_ms());
            }
            _ = poll.tick() => {
                driver.poll(clock::now_ms());
            }
            _ = save.tick() => {
                if let Err(e) = driver.save() {
                    tracing::warn!(error = %e, "Periodic save failed");
                }
            }
            _ = draw.tick(), if config.render_ms > 0 => {
                println!("{}", render::render(driver.simulation(), clock::now_ms()));
            }
            _ = &mut shutdown => {
                tracing::info!("Ctrl-C received, shutting down");
                break;
            }
            _ = &mut stop => {
                tracing::info!("Run duration elapsed, shutting down");
                break;
            }
        }
    }

    if let Err(e) = driver.save() {
        tracing::warn!(error = %e, "Final save failed");
    }
    let stats = driver.stats();
    tracing::info!(
        ticks = stats.ticks,
        polls = stats.polls,
        failed_polls = stats.failed_polls,
        coins = stats.coins,
        keys = stats.keys,
        rounds = stats.rounds,
        "Chat maze driver stopped"
    );
    Ok(())
}
