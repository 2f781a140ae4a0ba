#![allow(dead_code)]

use gf_core::{Analysis, Report, ReportBatch, ReportWithAnalysis};
use gf_ws::{ConnectionConfig, Hub, HubConfig, Metrics, ShutdownCoordinator, StreamState, stream_router};

use std::time::Duration;

use axum_test::TestServer;
use tokio::time::{Instant, sleep};

pub const TEST_STREAM_ID: &str = "montenegro";
pub const TEST_STREAM_PATH: &str = "/ws/montenegro";

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub max_subscribers: usize,
    pub connection: ConnectionConfig,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            max_subscribers: 100,
            connection: ConnectionConfig::default(),
        }
    }
}

impl TestServerConfig {
    /// Small hub for limit tests
    pub fn with_max_subscribers(max_subscribers: usize) -> Self {
        Self {
            max_subscribers,
            ..Default::default()
        }
    }

    /// Short heartbeat so a silent peer is dropped quickly
    pub fn with_fast_heartbeat() -> Self {
        Self {
            connection: ConnectionConfig {
                mailbox_capacity: 16,
                write_timeout: Duration::from_secs(1),
                ping_interval: Duration::from_millis(100),
                pong_timeout: Duration::from_millis(300),
            },
            ..Default::default()
        }
    }
}

/// Test server with access to the stream state
pub struct TestServerWithState {
    pub server: TestServer,
    pub state: StreamState,
}

impl TestServerWithState {
    pub fn hub(&self) -> &Hub {
        &self.state.hub
    }

    /// Poll until the hub holds `expected` subscribers or the deadline passes.
    pub async fn wait_for_clients(&self, expected: usize) -> usize {
        let deadline = Instant::now() + Duration::from_secs(3);
        loop {
            let current = self.hub().stats().await.connected_clients;
            if current == expected || Instant::now() >= deadline {
                return current;
            }
            sleep(Duration::from_millis(20)).await;
        }
    }
}

pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let metrics = Metrics::new();
    let state = StreamState {
        hub: Hub::new(
            HubConfig::new(TEST_STREAM_ID, config.max_subscribers),
            metrics.clone(),
        ),
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: config.connection,
    };

    let router = stream_router(TEST_STREAM_PATH, state.clone());
    let server = TestServer::builder()
        .http_transport()
        .build(router)
        .expect("Failed to create test server");

    TestServerWithState { server, state }
}

/// Batch of analyzed reports at the given sequences.
pub fn report_batch(seqs: &[i64]) -> ReportBatch {
    ReportBatch::new(
        seqs.iter()
            .map(|&seq| ReportWithAnalysis {
                report: Report::new(seq, format!("reporter-{seq}"), 42.5, 19.5),
                analysis: vec![Analysis::new(seq, "test-model", "en")],
            })
            .collect(),
    )
}
