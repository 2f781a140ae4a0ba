use gf_config::WebSocketConfig;

use std::time::Duration;

/// Per-connection timing and buffering
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Bounded mailbox size, in batches
    pub mailbox_capacity: usize,
    pub write_timeout: Duration,
    pub ping_interval: Duration,
    /// Maximum silence from the peer
    pub pong_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::from(&WebSocketConfig::default())
    }
}

impl From<&WebSocketConfig> for ConnectionConfig {
    fn from(config: &WebSocketConfig) -> Self {
        Self {
            mailbox_capacity: config.mailbox_capacity,
            write_timeout: config.write_timeout(),
            ping_interval: config.ping_interval(),
            pong_timeout: config.pong_timeout(),
        }
    }
}
