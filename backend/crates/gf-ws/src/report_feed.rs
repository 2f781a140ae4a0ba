use gf_core::{
    Analysis, ContainmentPredicate, ReportBatch, ReportStore, ReportWithAnalysis,
    Result as CoreResult,
};

use std::collections::HashMap;
use std::sync::Arc;

/// Pulls the next batch of broadcast-eligible reports for a boundary.
#[derive(Clone)]
pub struct ReportFeed {
    store: Arc<dyn ReportStore>,
    batch_limit: usize,
}

impl ReportFeed {
    pub fn new(store: Arc<dyn ReportStore>, batch_limit: usize) -> Self {
        Self { store, batch_limit }
    }

    /// Reports after `since_seq`, inside `predicate`, each joined with all of
    /// its analyses (ordered by language), ascending by sequence.
    ///
    /// At most `batch_limit` reports are returned; the rest wait for the next
    /// pull. An empty batch is a normal result.
    pub async fn pull(
        &self,
        predicate: &ContainmentPredicate,
        since_seq: i64,
    ) -> CoreResult<ReportBatch> {
        let reports = self
            .store
            .analyzed_reports_since(predicate, since_seq, self.batch_limit)
            .await?;

        if reports.is_empty() {
            return Ok(ReportBatch::empty());
        }

        let seqs: Vec<i64> = reports.iter().map(|r| r.seq).collect();
        let mut analyses = group_by_seq(self.store.analyses_for(&seqs).await?);

        // Inner join: a report whose analyses vanished is not eligible
        let pairs = reports
            .into_iter()
            .filter(|report| report.seq > since_seq)
            .filter_map(|report| {
                analyses
                    .remove(&report.seq)
                    .map(|analysis| ReportWithAnalysis { report, analysis })
            })
            .collect();

        Ok(ReportBatch::new(pairs))
    }
}

fn group_by_seq(analyses: Vec<Analysis>) -> HashMap<i64, Vec<Analysis>> {
    let mut grouped: HashMap<i64, Vec<Analysis>> = HashMap::new();
    for analysis in analyses {
        grouped.entry(analysis.seq).or_default().push(analysis);
    }

    for group in grouped.values_mut() {
        group.sort_by(|a, b| {
            a.language
                .cmp(&b.language)
                .then_with(|| a.source.cmp(&b.source))
        });
    }

    grouped
}
