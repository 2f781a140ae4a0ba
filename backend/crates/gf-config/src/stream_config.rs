use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_BOUNDARY_ID, DEFAULT_STREAM_ID, DEFAULT_STREAM_PATH,
    RESERVED_PATHS,
};

use serde::Deserialize;

/// One broadcast stream: a boundary filter served on a websocket path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamConfig {
    /// Cursor key; must stay stable across restarts
    pub stream_id: String,
    pub boundary_id: String,
    pub path: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            stream_id: String::from(DEFAULT_STREAM_ID),
            boundary_id: String::from(DEFAULT_BOUNDARY_ID),
            path: String::from(DEFAULT_STREAM_PATH),
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let valid_id = !self.stream_id.is_empty()
            && self
                .stream_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid_id {
            return Err(ConfigError::stream(format!(
                "streams.stream_id must be non-empty [A-Za-z0-9_-], got '{}'",
                self.stream_id
            )));
        }

        if self.boundary_id.trim().is_empty() {
            return Err(ConfigError::stream(format!(
                "stream '{}' has an empty boundary_id",
                self.stream_id
            )));
        }

        if !self.path.starts_with('/') || self.path.len() < 2 || self.path.ends_with('/') {
            return Err(ConfigError::stream(format!(
                "stream '{}' path must start with '/' and not end with one, got '{}'",
                self.stream_id, self.path
            )));
        }

        if RESERVED_PATHS.contains(&self.path.as_str()) {
            return Err(ConfigError::stream(format!(
                "stream '{}' path '{}' is reserved",
                self.stream_id, self.path
            )));
        }

        Ok(())
    }

    /// Per-stream health endpoint.
    pub fn health_path(&self) -> String {
        format!("{}/health", self.path)
    }
}
