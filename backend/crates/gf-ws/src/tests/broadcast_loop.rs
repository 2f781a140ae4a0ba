use crate::tests::{BOUNDARY_ID, INSIDE, OUTSIDE, STREAM_ID, catalog, delivered_seqs, hub};
use crate::{
    BroadcastLoop, BroadcastLoopConfig, BroadcastMessage, Hub, Metrics, ReportFeed,
    ShutdownCoordinator, Subscriber, TickOutcome,
};

use gf_core::{
    CoreError, CursorStore, InMemoryCursorStore, InMemoryReportStore, PredicateCache, Report,
    ReportStore,
};

use std::sync::Arc;
use std::time::Duration;

use googletest::prelude::*;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::sync::mpsc;
use tokio::time::timeout;

struct Fixture {
    reports: Arc<InMemoryReportStore>,
    cursors: Arc<InMemoryCursorStore>,
    hub: Hub,
}

impl Fixture {
    fn new() -> Self {
        let reports = Arc::new(InMemoryReportStore::new());
        let cursors = Arc::new(InMemoryCursorStore::new(Arc::clone(&reports)));

        Self {
            reports,
            cursors,
            hub: hub(10),
        }
    }

    fn config(&self, boundary_id: &str, tick_interval: Duration) -> BroadcastLoopConfig {
        BroadcastLoopConfig {
            stream_id: STREAM_ID.to_string(),
            boundary_id: boundary_id.to_string(),
            tick_interval,
        }
    }

    async fn start(&self, batch_limit: usize) -> BroadcastLoop {
        self.start_with(BOUNDARY_ID, batch_limit, Duration::from_secs(5))
            .await
            .unwrap()
    }

    async fn start_with(
        &self,
        boundary_id: &str,
        batch_limit: usize,
        tick_interval: Duration,
    ) -> gf_core::Result<BroadcastLoop> {
        BroadcastLoop::initialize(
            self.config(boundary_id, tick_interval),
            &catalog(),
            &PredicateCache::new(),
            ReportFeed::new(Arc::clone(&self.reports) as Arc<dyn ReportStore>, batch_limit),
            Arc::clone(&self.cursors) as Arc<dyn CursorStore>,
            self.hub.clone(),
            Metrics::new(),
        )
        .await
    }

    /// Report inside the boundary with one analysis.
    fn analyzed(&self) -> i64 {
        let seq = self.reports.add_report(INSIDE.0, INSIDE.1);
        self.reports.add_analysis(seq, "en");
        seq
    }

    async fn subscribe(&self, capacity: usize) -> mpsc::Receiver<BroadcastMessage> {
        let (subscriber, rx) = Subscriber::new(capacity);
        self.hub.register(subscriber).await.unwrap();
        rx
    }
}

fn drain(rx: &mut mpsc::Receiver<BroadcastMessage>) -> Vec<i64> {
    let mut seqs = Vec::new();
    while let Ok(message) = rx.try_recv() {
        seqs.extend(delivered_seqs(&message));
    }
    seqs
}

#[tokio::test]
async fn given_existing_reports_when_stream_first_starts_then_history_not_replayed() {
    // Given: analyzed reports that predate the stream
    let fixture = Fixture::new();
    fixture.analyzed();
    fixture.analyzed();

    // When
    let mut broadcast_loop = fixture.start(100).await;
    let outcome = broadcast_loop.tick().await;

    // Then: the cursor is seeded at the current maximum and persisted
    assert_that!(broadcast_loop.cursor(), eq(2));
    assert_that!(fixture.cursors.persisted(STREAM_ID), some(eq(2)));
    assert_that!(outcome, eq(&TickOutcome::Idle));
}

#[tokio::test]
async fn given_report_without_analysis_when_ticked_then_held_until_analyzed() {
    let fixture = Fixture::new();
    let mut broadcast_loop = fixture.start(100).await;
    let mut rx = fixture.subscribe(16).await;

    // Report lands, analysis not yet written
    let seq = fixture.reports.add_report(INSIDE.0, INSIDE.1);
    let before = broadcast_loop.tick().await;

    fixture.reports.add_analysis(seq, "en");
    let after = broadcast_loop.tick().await;

    assert_that!(before, eq(&TickOutcome::Idle));
    assert!(matches!(after, TickOutcome::Broadcast { reports: 1, to_seq, .. } if to_seq == seq));
    assert_that!(drain(&mut rx), elements_are![eq(&seq)]);
}

#[tokio::test]
async fn given_reports_outside_boundary_when_ticked_then_never_delivered() {
    let fixture = Fixture::new();
    let mut broadcast_loop = fixture.start(100).await;
    let mut rx = fixture.subscribe(16).await;

    let outside = fixture.reports.add_report(OUTSIDE.0, OUTSIDE.1);
    fixture.reports.add_analysis(outside, "en");

    assert_that!(broadcast_loop.tick().await, eq(&TickOutcome::Idle));
    assert_that!(drain(&mut rx), is_empty());
    assert_that!(broadcast_loop.cursor(), eq(0));
}

#[tokio::test]
async fn given_late_report_below_cursor_when_ticked_then_skipped_for_good() {
    // Given: sequences with a gap, already delivered
    let fixture = Fixture::new();
    let mut broadcast_loop = fixture.start(100).await;
    let mut rx = fixture.subscribe(16).await;
    for seq in [10, 20] {
        fixture.reports.insert_report(Report::new(seq, "reporter", INSIDE.0, INSIDE.1));
        fixture.reports.add_analysis(seq, "en");
    }
    broadcast_loop.tick().await;

    // When: a report commits late into the gap, then a new one arrives
    fixture.reports.insert_report(Report::new(15, "late", INSIDE.0, INSIDE.1));
    fixture.reports.add_analysis(15, "en");
    let next = fixture.analyzed();
    broadcast_loop.tick().await;

    // Then
    let delivered = drain(&mut rx);
    assert_that!(delivered, elements_are![eq(&10), eq(&20), eq(&next)]);
    assert!(delivered.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn given_batch_limit_when_backlog_then_drained_over_several_ticks() {
    let fixture = Fixture::new();
    let mut broadcast_loop = fixture.start(2).await;
    for _ in 0..5 {
        fixture.analyzed();
    }

    let first = broadcast_loop.tick().await;
    let second = broadcast_loop.tick().await;
    let third = broadcast_loop.tick().await;
    let fourth = broadcast_loop.tick().await;

    assert!(matches!(first, TickOutcome::Broadcast { reports: 2, to_seq: 2, .. }));
    assert!(matches!(second, TickOutcome::Broadcast { reports: 2, to_seq: 4, .. }));
    assert!(matches!(third, TickOutcome::Broadcast { reports: 1, to_seq: 5, .. }));
    assert_that!(fourth, eq(&TickOutcome::Idle));
    assert_that!(fixture.cursors.persisted(STREAM_ID), some(eq(5)));
}

#[tokio::test]
async fn given_restart_when_loop_reinitialized_then_resumes_after_persisted_cursor() {
    // Given: a first run delivers two reports
    let fixture = Fixture::new();
    let mut first_run = fixture.start(100).await;
    fixture.analyzed();
    fixture.analyzed();
    first_run.tick().await;
    drop(first_run);

    // When: more reports arrive while down, then the loop restarts
    let missed = fixture.analyzed();
    let mut second_run = fixture.start(100).await;
    let mut rx = fixture.subscribe(16).await;
    second_run.tick().await;

    // Then: only the report after the persisted cursor is sent
    assert_that!(drain(&mut rx), elements_are![eq(&missed)]);
    assert_that!(second_run.cursor(), eq(missed));
}

#[tokio::test]
async fn given_slow_subscriber_when_loop_broadcasts_then_others_keep_receiving() {
    let fixture = Fixture::new();
    let mut broadcast_loop = fixture.start(100).await;
    let _slow = fixture.subscribe(1).await;
    let mut fast = fixture.subscribe(16).await;

    fixture.analyzed();
    let first = broadcast_loop.tick().await;
    fixture.analyzed();
    let second = broadcast_loop.tick().await;

    assert!(matches!(first, TickOutcome::Broadcast { delivered: 2, evicted: 0, .. }));
    assert!(matches!(second, TickOutcome::Broadcast { delivered: 1, evicted: 1, .. }));
    assert_that!(drain(&mut fast), elements_are![eq(&1), eq(&2)]);
    assert_that!(fixture.hub.stats().await.connected_clients, eq(1));
}

#[tokio::test]
async fn given_store_outage_when_ticked_then_cursor_holds_and_next_tick_catches_up() {
    let fixture = Fixture::new();
    let mut broadcast_loop = fixture.start(100).await;
    let mut rx = fixture.subscribe(16).await;
    let seq = fixture.analyzed();

    fixture.reports.set_failing(true);
    let failed = broadcast_loop.tick().await;
    fixture.reports.set_failing(false);
    let recovered = broadcast_loop.tick().await;

    assert_that!(failed, eq(&TickOutcome::FeedFailed));
    assert!(matches!(recovered, TickOutcome::Broadcast { to_seq, .. } if to_seq == seq));
    assert_that!(drain(&mut rx), elements_are![eq(&seq)]);
}

#[test]
fn given_store_outage_when_ticked_then_tick_duration_still_recorded() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let outcome = metrics::with_local_recorder(&recorder, || {
        runtime.block_on(async {
            let fixture = Fixture::new();
            let mut broadcast_loop = fixture.start(100).await;
            fixture.reports.set_failing(true);
            broadcast_loop.tick().await
        })
    });

    let rendered = handle.render();
    assert_that!(outcome, eq(&TickOutcome::FeedFailed));
    assert!(rendered.contains("gf_broadcast_feed_errors_total"));
    assert!(rendered.contains("gf_broadcast_tick_duration_ms"));
}

#[tokio::test]
async fn given_cursor_persist_failure_when_ticked_then_no_duplicate_delivery() {
    let fixture = Fixture::new();
    let mut broadcast_loop = fixture.start(100).await;
    let mut rx = fixture.subscribe(16).await;

    fixture.cursors.set_failing(true);
    let first = fixture.analyzed();
    broadcast_loop.tick().await;
    let again = broadcast_loop.tick().await;

    // In memory the cursor moved; on disk it did not
    assert_that!(broadcast_loop.cursor(), eq(first));
    assert_that!(fixture.cursors.persisted(STREAM_ID), some(eq(0)));
    assert_that!(again, eq(&TickOutcome::Idle));

    fixture.cursors.set_failing(false);
    let second = fixture.analyzed();
    broadcast_loop.tick().await;

    assert_that!(fixture.cursors.persisted(STREAM_ID), some(eq(second)));
    assert_that!(drain(&mut rx), elements_are![eq(&first), eq(&second)]);
}

#[tokio::test]
async fn given_unknown_boundary_when_initialized_then_fails() {
    let fixture = Fixture::new();

    let result = fixture
        .start_with("-1", 100, Duration::from_secs(5))
        .await;

    assert!(matches!(result, Err(CoreError::BoundaryNotFound { .. })));
}

#[tokio::test]
async fn given_unreachable_store_when_initialized_then_transient_error() {
    let fixture = Fixture::new();
    fixture.reports.set_failing(true);

    let result = fixture.start_with(BOUNDARY_ID, 100, Duration::from_secs(5)).await;

    assert!(matches!(result, Err(ref e) if e.is_transient()));
}

#[tokio::test]
async fn given_running_loop_when_reports_arrive_then_delivered_until_shutdown() {
    // Given
    let fixture = Fixture::new();
    let broadcast_loop = fixture
        .start_with(BOUNDARY_ID, 100, Duration::from_millis(20))
        .await
        .unwrap();
    let mut rx = fixture.subscribe(16).await;
    let coordinator = ShutdownCoordinator::new();
    let handle = tokio::spawn(broadcast_loop.run(coordinator.subscribe_guard()));

    // When
    let seq = fixture.analyzed();
    let message = timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
    coordinator.shutdown();

    // Then
    assert_that!(delivered_seqs(&message), elements_are![eq(&seq)]);
    assert!(timeout(Duration::from_secs(2), handle).await.is_ok());
}
