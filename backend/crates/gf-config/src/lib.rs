mod broadcast_config;
mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod server_config;
mod stream_config;
mod websocket_config;

#[cfg(test)]
mod tests;

pub use broadcast_config::BroadcastConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use server_config::ServerConfig;
pub use stream_config::StreamConfig;
pub use websocket_config::WebSocketConfig;

const CONFIG_DIR_ENV: &str = "GF_CONFIG_DIR";
const DEFAULT_CONFIG_DIRECTORY: &str = ".gf";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const MIN_PORT: u16 = 1024;
const DEFAULT_MAX_CONNECTIONS: usize = 10_000;
const MIN_MAX_CONNECTIONS: usize = 1;
const MAX_MAX_CONNECTIONS: usize = 100_000;

const DEFAULT_DATABASE_FILENAME: &str = "reports.db";
const DEFAULT_DATABASE_POOL_SIZE: u32 = 5;
const DEFAULT_DATABASE_BUSY_TIMEOUT_SECS: u64 = 5;

const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

const DEFAULT_BOUNDARIES_FILENAME: &str = "boundaries.geojson";

const DEFAULT_STREAM_ID: &str = "montenegro";
const DEFAULT_BOUNDARY_ID: &str = "-53296";
const DEFAULT_STREAM_PATH: &str = "/ws/montenegro";

/// Paths the server routes itself; streams may not claim them.
const RESERVED_PATHS: [&str; 4] = ["/health", "/live", "/ready", "/metrics"];
