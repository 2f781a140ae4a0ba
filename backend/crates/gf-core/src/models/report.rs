use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geotagged incident report. Immutable once the store assigns `seq`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Store-assigned, monotonic, unique. Gaps are allowed.
    pub seq: i64,
    pub timestamp: DateTime<Utc>,

    /// Submitter identity
    pub id: String,
    pub team: i32,

    pub latitude: f64,
    pub longitude: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
}

impl Report {
    pub fn new(seq: i64, id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            seq,
            timestamp: Utc::now(),
            id: id.into(),
            team: 0,
            latitude,
            longitude,
            x: None,
            y: None,
            action_id: None,
        }
    }
}
