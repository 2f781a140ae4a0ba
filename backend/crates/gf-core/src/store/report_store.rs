use crate::{Analysis, ContainmentPredicate, Report, Result};

use async_trait::async_trait;

/// Read-only view of the report store consumed by the feed.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Current maximum report sequence, 0 for an empty store.
    async fn max_seq(&self) -> Result<i64>;

    /// Reports with `seq > since_seq` that lie inside `predicate` and have at
    /// least one analysis, ascending by sequence, at most `limit` of them.
    async fn analyzed_reports_since(
        &self,
        predicate: &ContainmentPredicate,
        since_seq: i64,
        limit: usize,
    ) -> Result<Vec<Report>>;

    /// All analyses for the given sequences, ordered by `(seq, language)`.
    async fn analyses_for(&self, seqs: &[i64]) -> Result<Vec<Analysis>>;
}
