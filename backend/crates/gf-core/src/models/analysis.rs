use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// AI-generated analysis of a report, one row per language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub seq: i64,
    pub source: String,
    pub analysis_text: String,
    pub title: String,
    pub description: String,

    /// In [0, 1]
    pub litter_probability: f64,
    /// In [0, 1]
    pub hazard_probability: f64,
    pub severity_level: f64,

    pub summary: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    pub fn new(seq: i64, source: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            seq,
            source: source.into(),
            analysis_text: String::new(),
            title: String::new(),
            description: String::new(),
            litter_probability: 0.0,
            hazard_probability: 0.0,
            severity_level: 0.0,
            summary: String::new(),
            language: language.into(),
            created_at: Utc::now(),
        }
    }
}
