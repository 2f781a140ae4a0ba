use crate::ErrorLocation;

use std::panic::Location;
use std::result::Result as StdResult;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid geometry for boundary {boundary_id}: {message} {location}")]
    InvalidGeometry {
        boundary_id: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Boundary not found: {boundary_id} {location}")]
    BoundaryNotFound {
        boundary_id: String,
        location: ErrorLocation,
    },

    #[error("GeoJSON parse error: {source} {location}")]
    GeoJson {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Store error: {message} {location}")]
    Store {
        message: String,
        location: ErrorLocation,
    },
}

impl CoreError {
    #[track_caller]
    pub fn invalid_geometry(boundary_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            boundary_id: boundary_id.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn boundary_not_found(boundary_id: impl Into<String>) -> Self {
        Self::BoundaryNotFound {
            boundary_id: boundary_id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Startup configuration problems. These are fatal; nothing retries them.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidGeometry { .. } | Self::BoundaryNotFound { .. } | Self::GeoJson { .. }
        )
    }

    /// Store failures mid-tick. The broadcast loop skips the tick and retries.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store { .. })
    }
}

impl From<serde_json::Error> for CoreError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::GeoJson {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = StdResult<T, CoreError>;
