use crate::ReportWithAnalysis;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One tick's worth of reports, ascending by sequence.
///
/// Serializes as the `data` object of the outbound envelope:
/// `{reports, count, from_seq, to_seq}`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportBatch {
    pub reports: Vec<ReportWithAnalysis>,
    pub count: usize,
    pub from_seq: i64,
    pub to_seq: i64,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

impl ReportBatch {
    pub fn empty() -> Self {
        Self {
            reports: Vec::new(),
            count: 0,
            from_seq: 0,
            to_seq: 0,
            created_at: Utc::now(),
        }
    }

    /// Build a batch from pairs, sorting ascending by sequence.
    pub fn new(mut reports: Vec<ReportWithAnalysis>) -> Self {
        if reports.is_empty() {
            return Self::empty();
        }

        reports.sort_by_key(ReportWithAnalysis::seq);

        let from_seq = reports[0].seq();
        let to_seq = reports[reports.len() - 1].seq();

        Self {
            count: reports.len(),
            reports,
            from_seq,
            to_seq,
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn seqs(&self) -> Vec<i64> {
        self.reports.iter().map(ReportWithAnalysis::seq).collect()
    }
}
