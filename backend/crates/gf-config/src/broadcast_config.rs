use crate::{ConfigError, ConfigErrorResult, DEFAULT_BOUNDARIES_FILENAME};

use std::time::Duration;

use serde::Deserialize;

// Tick interval constraints (seconds)
pub const MIN_TICK_INTERVAL_SECS: u64 = 1;
pub const MAX_TICK_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 5;

// Batch size constraints (reports per tick)
pub const MIN_BATCH_LIMIT: usize = 1;
pub const MAX_BATCH_LIMIT: usize = 100_000;
pub const DEFAULT_BATCH_LIMIT: usize = 1000;

/// Feed polling shared by every stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    pub tick_interval_secs: u64,
    /// Reports per tick; the remainder drains on later ticks
    pub batch_limit: usize,
    /// GeoJSON FeatureCollection of boundaries, relative to the config dir
    /// unless absolute
    pub boundaries_path: String,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: DEFAULT_TICK_INTERVAL_SECS,
            batch_limit: DEFAULT_BATCH_LIMIT,
            boundaries_path: String::from(DEFAULT_BOUNDARIES_FILENAME),
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.tick_interval_secs < MIN_TICK_INTERVAL_SECS
            || self.tick_interval_secs > MAX_TICK_INTERVAL_SECS
        {
            return Err(ConfigError::broadcast(format!(
                "broadcast.tick_interval_secs must be {}-{}, got {}",
                MIN_TICK_INTERVAL_SECS, MAX_TICK_INTERVAL_SECS, self.tick_interval_secs
            )));
        }

        if self.batch_limit < MIN_BATCH_LIMIT || self.batch_limit > MAX_BATCH_LIMIT {
            return Err(ConfigError::broadcast(format!(
                "broadcast.batch_limit must be {}-{}, got {}",
                MIN_BATCH_LIMIT, MAX_BATCH_LIMIT, self.batch_limit
            )));
        }

        if self.boundaries_path.trim().is_empty() {
            return Err(ConfigError::broadcast(
                "broadcast.boundaries_path must not be empty",
            ));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }
}
