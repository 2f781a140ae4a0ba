use crate::CursorRepository;

use gf_core::{CursorStore, ReportStore, Result as CoreResult};

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use sqlx::SqlitePool;

/// `CursorStore` over the `broadcast_cursors` table.
///
/// New cursors are seeded from the report store's newest sequence.
#[derive(Clone)]
pub struct SqliteCursorStore {
    pool: SqlitePool,
    reports: Arc<dyn ReportStore>,
}

impl SqliteCursorStore {
    pub fn new(pool: SqlitePool, reports: Arc<dyn ReportStore>) -> Self {
        Self { pool, reports }
    }
}

#[async_trait]
impl CursorStore for SqliteCursorStore {
    /// A stream with no cursor starts at the current newest report, so a new
    /// stream never replays history. The seed is persisted immediately.
    async fn load(&self, stream_id: &str) -> CoreResult<i64> {
        if let Some(cursor) = CursorRepository::find(&self.pool, stream_id).await? {
            return Ok(cursor.last_seq);
        }

        let seed = self.reports.max_seq().await?;
        if CursorRepository::create_if_absent(&self.pool, stream_id, seed).await? {
            info!("Seeded cursor for stream {stream_id} at seq {seed}");
            return Ok(seed);
        }

        // Another writer seeded first
        Ok(CursorRepository::find(&self.pool, stream_id)
            .await?
            .map_or(seed, |cursor| cursor.last_seq))
    }

    async fn advance(&self, stream_id: &str, seq: i64) -> CoreResult<bool> {
        Ok(CursorRepository::advance(&self.pool, stream_id, seq).await?)
    }
}
