#![allow(dead_code)]

use gf_config::{Config, StreamConfig};
use gf_core::{Analysis, BoundaryCatalog, GeographicBoundary, Report};
use gf_db::{AnalysisRepository, ReportRepository};
use gf_server::{Result as ServerResult, ServerState, StreamRuntime, build_router, initialize_streams};
use gf_ws::{BroadcastLoop, Metrics, ShutdownCoordinator};

use std::time::Duration;

use axum_test::TestServer;
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::SqlitePool;
use tempfile::TempDir;

pub const MONTENEGRO: (f64, f64) = (42.5, 19.5);
pub const KOTOR_BAY: (f64, f64) = (42.5, 18.5);

pub fn stream(stream_id: &str, boundary_id: &str) -> StreamConfig {
    StreamConfig {
        stream_id: stream_id.to_string(),
        boundary_id: boundary_id.to_string(),
        path: format!("/ws/{stream_id}"),
    }
}

/// Two side-by-side unit squares, lon 19-20 and 18-19, lat 42-43.
pub fn catalog() -> BoundaryCatalog {
    BoundaryCatalog::from_boundaries([
        GeographicBoundary::polygon(
            "-53296",
            "Montenegro",
            vec![vec![(19.0, 42.0), (20.0, 42.0), (20.0, 43.0), (19.0, 43.0)]],
        ),
        GeographicBoundary::polygon(
            "kotor",
            "Kotor",
            vec![vec![(18.0, 42.0), (19.0, 42.0), (19.0, 43.0), (18.0, 43.0)]],
        ),
    ])
}

pub struct TestApp {
    pub server: TestServer,
    pub pool: SqlitePool,
    pub shutdown: ShutdownCoordinator,
    pub loops: Vec<BroadcastLoop>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn insert_analyzed_report(&self, (latitude, longitude): (f64, f64)) -> i64 {
        let seq = ReportRepository::create(&self.pool, &Report::new(0, "reporter", latitude, longitude))
            .await
            .expect("Failed to insert report");
        AnalysisRepository::create(&self.pool, &Analysis::new(seq, "test-model", "en"))
            .await
            .expect("Failed to insert analysis");
        seq
    }

    pub fn broadcast_loop(&mut self, stream_id: &str) -> &mut BroadcastLoop {
        self.loops
            .iter_mut()
            .find(|l| l.stream_id() == stream_id)
            .expect("Unknown stream")
    }
}

pub async fn try_spawn_app(streams: Vec<StreamConfig>) -> (ServerResult<Vec<StreamRuntime>>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let pool = gf_db::create_pool(&dir.path().join("reports.db"), 4, Duration::from_secs(5))
        .await
        .expect("Failed to create pool");

    let mut config = Config::default();
    config.streams = streams;

    let result = initialize_streams(
        &config,
        &catalog(),
        &pool,
        &ShutdownCoordinator::new(),
        &Metrics::new(),
    )
    .await;

    (result, dir)
}

pub async fn spawn_app(streams: Vec<StreamConfig>) -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let pool = gf_db::create_pool(&dir.path().join("reports.db"), 4, Duration::from_secs(5))
        .await
        .expect("Failed to create pool");

    let mut config = Config::default();
    config.streams = streams;

    let shutdown = ShutdownCoordinator::new();
    let runtimes = initialize_streams(&config, &catalog(), &pool, &shutdown, &Metrics::new())
        .await
        .expect("Failed to initialize streams");

    let mut routes = Vec::new();
    let mut entries = Vec::new();
    let mut loops = Vec::new();
    for runtime in runtimes {
        routes.push((runtime.entry.path.clone(), runtime.state));
        entries.push(runtime.entry);
        loops.push(runtime.broadcast_loop);
    }

    let state = ServerState {
        streams: entries,
        shutdown: shutdown.clone(),
        prometheus: PrometheusBuilder::new().build_recorder().handle(),
    };

    let server = TestServer::builder()
        .http_transport()
        .build(build_router(state, routes))
        .expect("Failed to create test server");

    TestApp {
        server,
        pool,
        shutdown,
        loops,
        _dir: dir,
    }
}
