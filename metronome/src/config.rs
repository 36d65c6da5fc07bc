// Layered runtime settings for embedding hosts and the demo binary.

use crate::scheduler::SchedulerConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime settings with layered precedence: defaults, then an optional
/// `metronome.toml`, then `METRONOME_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Poll interval for the scheduler loop, in milliseconds.
    pub poll_interval_ms: u64,
    /// Log level filter handed to [`crate::telemetry::init_logging`].
    pub log_level: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("metronome")
    }

    /// Load from a specific config file base name (without extension).
    pub fn load_from_path(config_file: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("poll_interval_ms", 333u64)?
            .set_default("log_level", "info")?
            .add_source(File::with_name(config_file).required(false))
            .add_source(Environment::with_prefix("METRONOME"));

        builder.build()?.try_deserialize()
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}
