use crate::{Hub, Metrics, MetricsTimer, ReportFeed, ShutdownGuard};

use gf_core::{
    BoundaryCatalog, ContainmentPredicate, CursorStore, PredicateCache, Result as CoreResult,
};

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{Instrument, info_span};

/// What one stream polls and where it publishes.
#[derive(Debug, Clone)]
pub struct BroadcastLoopConfig {
    pub stream_id: String,
    pub boundary_id: String,
    pub tick_interval: Duration,
}

/// Result of one tick, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing new past the cursor
    Idle,
    /// A batch was handed to the hub and the cursor moved to `to_seq`
    Broadcast {
        reports: usize,
        to_seq: i64,
        delivered: usize,
        evicted: usize,
    },
    /// The feed failed; the cursor did not move and the next tick retries
    FeedFailed,
    /// The batch could not be encoded; the cursor did not move
    BroadcastFailed,
}

/// Per-stream coordinator: feed, then hub, then cursor.
///
/// Constructed by [`BroadcastLoop::initialize`], which resolves the boundary,
/// builds its predicate and loads the cursor. A loop that exists is running;
/// it stops only through its shutdown guard.
pub struct BroadcastLoop {
    config: BroadcastLoopConfig,
    predicate: Arc<ContainmentPredicate>,
    feed: ReportFeed,
    cursors: Arc<dyn CursorStore>,
    hub: Hub,
    metrics: Metrics,
    cursor: i64,
}

impl BroadcastLoop {
    /// Fails with `BoundaryNotFound` or `InvalidGeometry` for a bad boundary
    /// (fatal), or a store error if the cursor cannot be loaded.
    pub async fn initialize(
        config: BroadcastLoopConfig,
        catalog: &BoundaryCatalog,
        predicates: &PredicateCache,
        feed: ReportFeed,
        cursors: Arc<dyn CursorStore>,
        hub: Hub,
        metrics: Metrics,
    ) -> CoreResult<Self> {
        let boundary = catalog.get(&config.boundary_id)?;
        let predicate = predicates.get_or_build(boundary)?;
        let cursor = cursors.load(&config.stream_id).await?;

        info!(
            "Stream {} initialized: boundary {} ({}), {} polygon(s), cursor at seq {}",
            config.stream_id,
            boundary.id,
            boundary.name,
            predicate.polygon_count(),
            cursor
        );
        metrics.cursor_position(&config.stream_id, cursor);

        Ok(Self {
            config,
            predicate,
            feed,
            cursors,
            hub,
            metrics,
            cursor,
        })
    }

    pub fn stream_id(&self) -> &str {
        &self.config.stream_id
    }

    /// Highest sequence handed to the hub (or the seed).
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Tick until shutdown. The first tick fires one interval after start;
    /// an in-flight tick always completes before the loop exits.
    pub async fn run(mut self, mut shutdown: ShutdownGuard) {
        let period = self.config.tick_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Broadcast loop for stream {} running every {:?}",
            self.stream_id(),
            period
        );

        loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => {
                    info!(
                        "Broadcast loop for stream {} stopped at seq {}",
                        self.stream_id(),
                        self.cursor
                    );
                    break;
                }

                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// One poll-broadcast-advance cycle.
    pub async fn tick(&mut self) -> TickOutcome {
        let span = info_span!(
            "broadcast_tick",
            stream_id = %self.config.stream_id,
            since_seq = self.cursor,
        );

        self.tick_inner().instrument(span).await
    }

    async fn tick_inner(&mut self) -> TickOutcome {
        let stream_id = self.config.stream_id.clone();
        let timer = MetricsTimer::new(self.metrics.clone(), stream_id.as_str());

        let batch = match self.feed.pull(&self.predicate, self.cursor).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Stream {stream_id}: feed failed, retrying next tick: {e}");
                self.metrics.feed_failed(&stream_id);
                timer.finish();
                return TickOutcome::FeedFailed;
            }
        };

        if batch.is_empty() {
            debug!("Stream {stream_id}: no new reports after seq {}", self.cursor);
            timer.finish();
            return TickOutcome::Idle;
        }

        let outcome = match self.hub.broadcast(&batch).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    "Stream {stream_id}: failed to broadcast batch {}-{}: {e}",
                    batch.from_seq, batch.to_seq
                );
                timer.finish();
                return TickOutcome::BroadcastFailed;
            }
        };

        // The batch is with the hub: the cursor moves even if persisting fails
        self.cursor = batch.to_seq;
        self.metrics.cursor_position(&stream_id, self.cursor);
        self.metrics
            .batch_broadcast(&stream_id, batch.count, outcome.delivered);

        if let Err(e) = self.cursors.advance(&stream_id, batch.to_seq).await {
            error!(
                "Stream {stream_id}: failed to persist cursor {} (kept in memory): {e}",
                batch.to_seq
            );
            self.metrics.cursor_persist_failed(&stream_id);
        }

        timer.finish();

        TickOutcome::Broadcast {
            reports: batch.count,
            to_seq: batch.to_seq,
            delivered: outcome.delivered,
            evicted: outcome.evicted_count(),
        }
    }
}
