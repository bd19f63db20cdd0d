//! Demo configuration, read from an optional JSON file.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use scene_systems::UpdaterConfig;

/// Tick-loop timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
}

impl TickConfig {
    /// Length of one tick, `1 / tick_rate` seconds.
    ///
    /// # Errors
    ///
    /// Fails if the rate is not a positive finite number or its period does
    /// not fit in a [`Duration`].
    pub fn tick_duration(&self) -> Result<Duration> {
        anyhow::ensure!(
            self.tick_rate.is_finite() && self.tick_rate > 0.0,
            "tick_rate must be a positive number, got {}",
            self.tick_rate
        );
        Duration::try_from_secs_f64(1.0 / self.tick_rate)
            .with_context(|| format!("tick_rate {} has no representable period", self.tick_rate))
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
        }
    }
}

/// Everything the demo reads at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tick-loop timing.
    pub tick: TickConfig,
    /// Settings for the per-frame systems.
    pub systems: UpdaterConfig,
}

impl AppConfig {
    /// Load from `path`, or use defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid JSON for this shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Parse from a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or a tick rate without a usable period.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.tick.tick_duration()?;
        Ok(config)
    }
}
