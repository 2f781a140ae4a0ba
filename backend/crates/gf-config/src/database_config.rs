use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_DATABASE_BUSY_TIMEOUT_SECS, DEFAULT_DATABASE_FILENAME,
    DEFAULT_DATABASE_POOL_SIZE,
};

use std::time::Duration;

use serde::Deserialize;

pub const MAX_DATABASE_POOL_SIZE: u32 = 64;

/// The report database. `path` is resolved against the config directory
/// when relative.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::from(DEFAULT_DATABASE_FILENAME),
            max_connections: DEFAULT_DATABASE_POOL_SIZE,
            busy_timeout_secs: DEFAULT_DATABASE_BUSY_TIMEOUT_SECS,
        }
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::database("database.path must not be empty"));
        }

        if self.max_connections == 0 || self.max_connections > MAX_DATABASE_POOL_SIZE {
            return Err(ConfigError::database(format!(
                "database.max_connections must be 1-{}, got {}",
                MAX_DATABASE_POOL_SIZE, self.max_connections
            )));
        }

        Ok(())
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }
}
