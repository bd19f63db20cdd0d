//! # scene_app
//!
//! Runs a small demo scene through the scene core at a fixed tick rate.
//!
//! ## Usage
//!
//! ```text
//! scene_app [config.json]
//! ```
//!
//! The optional JSON file may set `tick.tick_rate`, `tick.max_ticks`, and
//! `systems.default_material`. Log verbosity follows `RUST_LOG`.

mod config;
mod physics;
mod scene;
mod tick;

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use scene::DemoScene;
use tick::TickLoop;

/// Tick limit applied when the configuration asks for an unlimited run.
const DEMO_TICK_CAP: u64 = 600;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("scene_app=info".parse()?))
        .init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let mut config = AppConfig::load(path.as_deref())?;
    if config.tick.max_ticks == 0 {
        config.tick.max_ticks = DEMO_TICK_CAP;
    }

    info!(
        config = ?path,
        default_material = %config.systems.default_material,
        "scene demo starting"
    );

    let scene = DemoScene::build(&config.systems.default_material)?;
    let mut tick_loop = TickLoop::new(config.tick, &config.systems, scene);
    tick_loop.run()?;

    info!(ticks = tick_loop.tick_id(), "scene demo shut down");
    Ok(())
}
