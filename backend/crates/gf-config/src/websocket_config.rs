use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Mailbox capacity constraints (batches)
pub const MIN_MAILBOX_CAPACITY: usize = 1;
pub const MAX_MAILBOX_CAPACITY: usize = 10000;
pub const DEFAULT_MAILBOX_CAPACITY: usize = 256;

// Write deadline constraints (seconds)
pub const MIN_WRITE_TIMEOUT_SECS: u64 = 1;
pub const MAX_WRITE_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 10;

// Ping interval constraints (seconds)
pub const MIN_PING_INTERVAL_SECS: u64 = 1;
pub const MAX_PING_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_PING_INTERVAL_SECS: u64 = 54;

// Pong deadline constraints (seconds)
pub const MIN_PONG_TIMEOUT_SECS: u64 = 2;
pub const MAX_PONG_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_PONG_TIMEOUT_SECS: u64 = 60;

/// Per-subscriber connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Outbound batches a subscriber may have queued before it is evicted
    pub mailbox_capacity: usize,
    /// Deadline for writing one frame
    pub write_timeout_secs: u64,
    /// Protocol ping interval
    pub ping_interval_secs: u64,
    /// Silence allowed from the peer before the connection is closed
    pub pong_timeout_secs: u64,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            write_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
            ping_interval_secs: DEFAULT_PING_INTERVAL_SECS,
            pong_timeout_secs: DEFAULT_PONG_TIMEOUT_SECS,
        }
    }
}

impl WebSocketConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.mailbox_capacity < MIN_MAILBOX_CAPACITY
            || self.mailbox_capacity > MAX_MAILBOX_CAPACITY
        {
            return Err(ConfigError::config(format!(
                "websocket.mailbox_capacity must be {}-{}, got {}",
                MIN_MAILBOX_CAPACITY, MAX_MAILBOX_CAPACITY, self.mailbox_capacity
            )));
        }

        if self.write_timeout_secs < MIN_WRITE_TIMEOUT_SECS
            || self.write_timeout_secs > MAX_WRITE_TIMEOUT_SECS
        {
            return Err(ConfigError::config(format!(
                "websocket.write_timeout_secs must be {}-{}, got {}",
                MIN_WRITE_TIMEOUT_SECS, MAX_WRITE_TIMEOUT_SECS, self.write_timeout_secs
            )));
        }

        if self.ping_interval_secs < MIN_PING_INTERVAL_SECS
            || self.ping_interval_secs > MAX_PING_INTERVAL_SECS
        {
            return Err(ConfigError::config(format!(
                "websocket.ping_interval_secs must be {}-{}, got {}",
                MIN_PING_INTERVAL_SECS, MAX_PING_INTERVAL_SECS, self.ping_interval_secs
            )));
        }

        if self.pong_timeout_secs < MIN_PONG_TIMEOUT_SECS
            || self.pong_timeout_secs > MAX_PONG_TIMEOUT_SECS
        {
            return Err(ConfigError::config(format!(
                "websocket.pong_timeout_secs must be {}-{}, got {}",
                MIN_PONG_TIMEOUT_SECS, MAX_PONG_TIMEOUT_SECS, self.pong_timeout_secs
            )));
        }

        if self.pong_timeout_secs <= self.ping_interval_secs {
            return Err(ConfigError::config(format!(
                "websocket.pong_timeout_secs ({}) must be greater than ping_interval_secs ({})",
                self.pong_timeout_secs, self.ping_interval_secs
            )));
        }

        Ok(())
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn pong_timeout(&self) -> Duration {
        Duration::from_secs(self.pong_timeout_secs)
    }
}
