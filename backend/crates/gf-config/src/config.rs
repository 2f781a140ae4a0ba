use crate::{
    BroadcastConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIRECTORY, DatabaseConfig, LoggingConfig, ServerConfig, StreamConfig,
    WebSocketConfig,
};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub websocket: WebSocketConfig,
    pub broadcast: BroadcastConfig,
    pub streams: Vec<StreamConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            websocket: WebSocketConfig::default(),
            broadcast: BroadcastConfig::default(),
            streams: vec![StreamConfig::default()],
        }
    }
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. GF_CONFIG_DIR env var, else ./.gf/
    /// 2. Auto-create the config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply GF_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: GF_CONFIG_DIR env var > ./.gf/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIRECTORY))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.websocket.validate()?;
        self.broadcast.validate()?;

        if self.streams.is_empty() {
            return Err(ConfigError::stream("at least one [[streams]] entry is required"));
        }

        let mut stream_ids = HashSet::new();
        let mut paths = HashSet::new();
        for stream in &self.streams {
            stream.validate()?;

            if !stream_ids.insert(stream.stream_id.as_str()) {
                return Err(ConfigError::stream(format!(
                    "duplicate stream_id '{}'",
                    stream.stream_id
                )));
            }
            if !paths.insert(stream.path.as_str()) {
                return Err(ConfigError::stream(format!(
                    "duplicate stream path '{}'",
                    stream.path
                )));
            }
        }

        Ok(())
    }

    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Self::resolve(&self.database.path)
    }

    pub fn boundaries_path(&self) -> ConfigErrorResult<PathBuf> {
        Self::resolve(&self.broadcast.boundaries_path)
    }

    /// Log file path, if logging to a file.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        let Some(file) = &self.logging.file else {
            return Ok(None);
        };

        Ok(Some(Self::resolve(&self.logging.dir)?.join(file)))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Absolute paths are used as-is; relative ones live under the config dir.
    fn resolve(path: &str) -> ConfigErrorResult<PathBuf> {
        let path = Path::new(path);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }

        Ok(Self::config_dir()?.join(path))
    }

    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (max {} subscribers per stream)",
            self.server.host, self.server.port, self.server.max_connections
        );
        info!(
            "  database: {} (pool {}, busy timeout {}s)",
            self.database.path, self.database.max_connections, self.database.busy_timeout_secs
        );
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
        info!(
            "  websocket: mailbox={}, write={}s, ping={}s/{}s",
            self.websocket.mailbox_capacity,
            self.websocket.write_timeout_secs,
            self.websocket.ping_interval_secs,
            self.websocket.pong_timeout_secs
        );
        info!(
            "  broadcast: tick={}s, batch={}, boundaries={}",
            self.broadcast.tick_interval_secs,
            self.broadcast.batch_limit,
            self.broadcast.boundaries_path
        );
        for stream in &self.streams {
            info!(
                "  stream {}: boundary {} at {}",
                stream.stream_id, stream.boundary_id, stream.path
            );
        }
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("GF_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("GF_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse(
            "GF_SERVER_MAX_CONNECTIONS",
            &mut self.server.max_connections,
        );

        // Database
        Self::apply_env_string("GF_DATABASE_PATH", &mut self.database.path);
        Self::apply_env_parse(
            "GF_DATABASE_MAX_CONNECTIONS",
            &mut self.database.max_connections,
        );
        Self::apply_env_parse(
            "GF_DATABASE_BUSY_TIMEOUT_SECS",
            &mut self.database.busy_timeout_secs,
        );

        // Logging
        Self::apply_env_parse("GF_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("GF_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("GF_LOG_FILE", &mut self.logging.file);
        Self::apply_env_string("GF_LOG_DIR", &mut self.logging.dir);

        // WebSocket
        Self::apply_env_parse(
            "GF_WS_MAILBOX_CAPACITY",
            &mut self.websocket.mailbox_capacity,
        );
        Self::apply_env_parse(
            "GF_WS_WRITE_TIMEOUT_SECS",
            &mut self.websocket.write_timeout_secs,
        );
        Self::apply_env_parse(
            "GF_WS_PING_INTERVAL_SECS",
            &mut self.websocket.ping_interval_secs,
        );
        Self::apply_env_parse(
            "GF_WS_PONG_TIMEOUT_SECS",
            &mut self.websocket.pong_timeout_secs,
        );

        // Broadcast
        Self::apply_env_parse(
            "GF_BROADCAST_TICK_INTERVAL_SECS",
            &mut self.broadcast.tick_interval_secs,
        );
        Self::apply_env_parse("GF_BROADCAST_BATCH_LIMIT", &mut self.broadcast.batch_limit);
        Self::apply_env_string(
            "GF_BROADCAST_BOUNDARIES_PATH",
            &mut self.broadcast.boundaries_path,
        );
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values leave the target unchanged.
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
