use crate::ServerState;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
struct StreamSummary<'a> {
    stream_id: &'a str,
    boundary_id: &'a str,
    path: &'a str,
    connected_clients: usize,
    last_broadcast_seq: i64,
}

/// GET /health - Service status with every stream's hub stats
pub async fn health(State(state): State<ServerState>) -> Response {
    let mut streams = Vec::with_capacity(state.streams.len());
    for entry in &state.streams {
        let stats = entry.hub.stats().await;
        streams.push(StreamSummary {
            stream_id: &entry.stream_id,
            boundary_id: &entry.boundary_id,
            path: &entry.path,
            connected_clients: stats.connected_clients,
            last_broadcast_seq: stats.last_broadcast_seq,
        });
    }

    let status = if state.shutdown.is_shutdown() {
        "shutting_down"
    } else {
        "healthy"
    };

    let health = json!({
        "status": status,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "streams": streams,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - Liveness probe (is the process alive?)
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - Readiness probe. Streams are initialized before the router
/// exists, so only shutdown makes this fail.
pub async fn readiness(State(state): State<ServerState>) -> Response {
    if state.shutdown.is_shutdown() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }

    (StatusCode::OK, "Ready").into_response()
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics(State(state): State<ServerState>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.prometheus.render(),
    )
        .into_response()
}
