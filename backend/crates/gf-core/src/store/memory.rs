//! In-memory store doubles for exercising the feed and broadcast loop without
//! a database.

use crate::{Analysis, ContainmentPredicate, CoreError, CursorStore, Report, ReportStore, Result};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

#[derive(Default)]
struct ReportTables {
    reports: Vec<Report>,
    analyses: Vec<Analysis>,
}

#[derive(Default)]
pub struct InMemoryReportStore {
    tables: Mutex<ReportTables>,
    failing: AtomicBool,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a report at the next sequence and return that sequence.
    pub fn add_report(&self, latitude: f64, longitude: f64) -> i64 {
        let mut tables = self.lock();
        let seq = tables.reports.last().map_or(1, |r| r.seq + 1);
        tables
            .reports
            .push(Report::new(seq, format!("reporter-{seq}"), latitude, longitude));
        seq
    }

    /// Insert a report with an explicit sequence (for gap cases).
    pub fn insert_report(&self, report: Report) {
        let mut tables = self.lock();
        tables.reports.push(report);
        tables.reports.sort_by_key(|r| r.seq);
    }

    pub fn add_analysis(&self, seq: i64, language: &str) {
        self.lock()
            .analyses
            .push(Analysis::new(seq, "test-model", language));
    }

    /// Make every query fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::store("report store unavailable"));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ReportTables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn max_seq(&self) -> Result<i64> {
        self.check_available()?;
        Ok(self.lock().reports.iter().map(|r| r.seq).max().unwrap_or(0))
    }

    async fn analyzed_reports_since(
        &self,
        predicate: &ContainmentPredicate,
        since_seq: i64,
        limit: usize,
    ) -> Result<Vec<Report>> {
        self.check_available()?;
        let tables = self.lock();

        Ok(tables
            .reports
            .iter()
            .filter(|r| r.seq > since_seq)
            .filter(|r| predicate.contains(r.latitude, r.longitude))
            .filter(|r| tables.analyses.iter().any(|a| a.seq == r.seq))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn analyses_for(&self, seqs: &[i64]) -> Result<Vec<Analysis>> {
        self.check_available()?;
        let tables = self.lock();

        let mut analyses: Vec<Analysis> = tables
            .analyses
            .iter()
            .filter(|a| seqs.contains(&a.seq))
            .cloned()
            .collect();
        analyses.sort_by(|a, b| a.seq.cmp(&b.seq).then_with(|| a.language.cmp(&b.language)));

        Ok(analyses)
    }
}

pub struct InMemoryCursorStore {
    reports: Arc<InMemoryReportStore>,
    cursors: Mutex<HashMap<String, i64>>,
    failing: AtomicBool,
}

impl InMemoryCursorStore {
    pub fn new(reports: Arc<InMemoryReportStore>) -> Self {
        Self {
            reports,
            cursors: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn persisted(&self, stream_id: &str) -> Option<i64> {
        self.lock().get(stream_id).copied()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, i64>> {
        self.cursors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CursorStore for InMemoryCursorStore {
    async fn load(&self, stream_id: &str) -> Result<i64> {
        if let Some(seq) = self.persisted(stream_id) {
            return Ok(seq);
        }

        let seed = self.reports.max_seq().await?;
        Ok(*self.lock().entry(stream_id.to_string()).or_insert(seed))
    }

    async fn advance(&self, stream_id: &str, seq: i64) -> Result<bool> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::store("cursor store unavailable"));
        }

        let mut cursors = self.lock();
        match cursors.get(stream_id) {
            Some(&stored) if stored >= seq => Ok(false),
            _ => {
                cursors.insert(stream_id.to_string(), seq);
                Ok(true)
            }
        }
    }
}
