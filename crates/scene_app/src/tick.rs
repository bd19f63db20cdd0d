//! Fixed-timestep tick loop.
//!
//! Each tick steps the demo physics and runs the systems updater once with
//! `dt = 1 / tick_rate`. When a tick finishes early the loop sleeps for the
//! rest of its budget; when it overruns, a warning is logged and the next
//! tick starts immediately.

use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info, warn};

use scene_systems::{FrameReport, SystemsUpdater, UpdaterConfig};

use crate::config::TickConfig;
use crate::scene::DemoScene;

/// The tick loop and the scene it drives.
#[derive(Debug)]
pub struct TickLoop {
    tick_id: u64,
    config: TickConfig,
    updater: SystemsUpdater,
    scene: DemoScene,
    /// Submitted instances summed over all ticks.
    submitted: u64,
}

impl TickLoop {
    /// Create a tick loop over `scene`.
    #[must_use]
    pub fn new(config: TickConfig, systems: &UpdaterConfig, scene: DemoScene) -> Self {
        Self {
            tick_id: 0,
            config,
            updater: SystemsUpdater::new(systems),
            scene,
            submitted: 0,
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns the scene.
    #[must_use]
    pub fn scene(&self) -> &DemoScene {
        &self.scene
    }

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// Propagates a system error. The tick counter still advances.
    pub fn tick(&mut self, dt: f64) -> Result<FrameReport> {
        self.tick_id += 1;
        debug!(tick_id = self.tick_id, dt, "tick start");

        let report = self.scene.step(&mut self.updater, dt as f32)?;
        self.submitted += report.pre_render.submitted as u64;
        Ok(report)
    }

    /// Run for the configured number of ticks, or forever if `max_ticks` is 0.
    ///
    /// # Errors
    ///
    /// Fails up front if the tick rate has no usable period, and stops at
    /// the first failing tick.
    pub fn run(&mut self) -> Result<()> {
        let tick_duration = self.config.tick_duration()?;
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            entities = self.scene.registry.entity_count(),
            bodies = self.scene.physics.len(),
            "starting tick loop"
        );

        loop {
            let start = Instant::now();
            self.tick(tick_duration.as_secs_f64())?;

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(
                    ticks = tick_count,
                    submitted = self.submitted,
                    "tick loop complete"
                );
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
        Ok(())
    }
}
