use crate::{AnalysisRepository, ReportRepository};

use gf_core::{Analysis, ContainmentPredicate, Report, ReportStore, Result as CoreResult};

use async_trait::async_trait;
use log::debug;
use sqlx::SqlitePool;

/// Bounding-box candidates fetched per round trip.
const DEFAULT_PAGE_SIZE: i64 = 500;

/// Bound parameters per `IN (...)` query, under SQLite's variable limit.
const SEQ_CHUNK: usize = 500;

/// `ReportStore` over the SQLite report database.
///
/// Containment runs in two stages: the bounding box in SQL, then the exact
/// predicate here. Pages continue until `limit` contained rows are found or
/// candidates run out, so a run of rows inside the box but outside the
/// polygon never stalls the feed.
#[derive(Clone)]
pub struct SqliteReportStore {
    pool: SqlitePool,
    page_size: i64,
}

impl SqliteReportStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ReportStore for SqliteReportStore {
    async fn max_seq(&self) -> CoreResult<i64> {
        Ok(ReportRepository::max_seq(&self.pool).await?)
    }

    async fn analyzed_reports_since(
        &self,
        predicate: &ContainmentPredicate,
        since_seq: i64,
        limit: usize,
    ) -> CoreResult<Vec<Report>> {
        let mut contained = Vec::new();
        if limit == 0 {
            return Ok(contained);
        }

        let bbox = predicate.bounding_box();
        let mut after = since_seq;
        let mut scanned = 0usize;

        loop {
            let page =
                ReportRepository::find_analyzed_in_bbox(&self.pool, after, &bbox, self.page_size)
                    .await?;

            let Some(last) = page.last() else {
                break;
            };
            after = last.seq;
            scanned += page.len();
            let exhausted = (page.len() as i64) < self.page_size;

            for report in page {
                if predicate.contains(report.latitude, report.longitude) {
                    contained.push(report);
                    if contained.len() == limit {
                        return Ok(contained);
                    }
                }
            }

            if exhausted {
                break;
            }
        }

        debug!(
            "Boundary {}: {} of {scanned} candidates contained after seq {since_seq}",
            predicate.boundary_id(),
            contained.len()
        );

        Ok(contained)
    }

    async fn analyses_for(&self, seqs: &[i64]) -> CoreResult<Vec<Analysis>> {
        let mut analyses = Vec::new();
        for chunk in seqs.chunks(SEQ_CHUNK) {
            analyses.extend(AnalysisRepository::find_by_seqs(&self.pool, chunk).await?);
        }

        Ok(analyses)
    }
}
