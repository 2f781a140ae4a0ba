use gf_ws::{Hub, ShutdownCoordinator};

use metrics_exporter_prometheus::PrometheusHandle;

/// A served stream as the global endpoints see it.
#[derive(Clone)]
pub struct StreamEntry {
    pub stream_id: String,
    pub boundary_id: String,
    pub path: String,
    pub hub: Hub,
}

/// Shared state for the server-wide routes.
#[derive(Clone)]
pub struct ServerState {
    pub streams: Vec<StreamEntry>,
    pub shutdown: ShutdownCoordinator,
    pub prometheus: PrometheusHandle,
}
