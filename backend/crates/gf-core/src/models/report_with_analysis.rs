use crate::{Analysis, Report};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportWithAnalysis {
    pub report: Report,
    /// Never empty for a broadcast-eligible report, ordered by language.
    pub analysis: Vec<Analysis>,
}

impl ReportWithAnalysis {
    pub fn seq(&self) -> i64 {
        self.report.seq
    }
}
