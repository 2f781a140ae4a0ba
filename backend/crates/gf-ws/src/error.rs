use std::panic::Location;

use error_location::ErrorLocation;
use gf_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Write did not complete within {timeout_ms}ms {location}")]
    WriteTimeout {
        timeout_ms: u128,
        location: ErrorLocation,
    },

    #[error("No inbound traffic for {timeout_ms}ms {location}")]
    HeartbeatTimeout {
        timeout_ms: u128,
        location: ErrorLocation,
    },

    #[error("Connection limit exceeded: {current} subscribers (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Failed to serialize batch: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Internal error: {message} {location}")]
    Internal {
        message: String,
        location: ErrorLocation,
    },
}

impl WsError {
    #[track_caller]
    pub fn connection_closed(reason: impl Into<String>) -> Self {
        Self::ConnectionClosed {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Transport failures end one connection; nothing else is affected.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionClosed { .. } | Self::WriteTimeout { .. } | Self::HeartbeatTimeout { .. }
        )
    }

    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ConnectionClosed { .. } => "closed",
            Self::WriteTimeout { .. } => "write_timeout",
            Self::HeartbeatTimeout { .. } => "heartbeat_timeout",
            Self::ConnectionLimitExceeded { .. } => "connection_limit",
            Self::Serialization { .. } => "serialization",
            Self::Core(_) => "core",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<serde_json::Error> for WsError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
