use crate::{
    BroadcastMessage, ConnectionConfig, Hub, Metrics, ShutdownCoordinator, Subscriber,
    SubscriberId, WebSocketConnection,
};

use axum::{
    Json, Router,
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::Response,
    routing::get,
};
use chrono::{DateTime, Utc};
use log::{error, warn};
use serde::Serialize;
use tokio::sync::mpsc;

/// Shared state for one stream's websocket and health routes.
#[derive(Clone)]
pub struct StreamState {
    pub hub: Hub,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

/// Per-stream health body
#[derive(Debug, Serialize)]
pub struct StreamHealth {
    pub status: &'static str,
    pub stream_id: String,
    pub connected_clients: usize,
    pub last_broadcast_seq: i64,
    pub timestamp: DateTime<Utc>,
}

/// `{path}` upgrades to the stream, `{path}/health` reports its hub.
pub fn stream_router(path: &str, state: StreamState) -> Router {
    Router::new()
        .route(path, get(handler))
        .route(&format!("{path}/health"), get(health_handler))
        .with_state(state)
}

/// WebSocket upgrade handler.
///
/// The subscriber is registered before the upgrade so that a full hub
/// answers 503 instead of accepting and dropping the socket.
pub async fn handler(
    State(state): State<StreamState>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    if state.shutdown.is_shutdown() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let (subscriber, mailbox) = Subscriber::new(state.config.mailbox_capacity);
    let subscriber_id = subscriber.id();
    let connection_shutdown = subscriber.shutdown().clone();

    state.hub.register(subscriber).await.map_err(|e| {
        warn!("Rejected subscriber on stream {}: {}", state.hub.stream_id(), e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let failed_hub = state.hub.clone();
    let response = ws
        .on_failed_upgrade(move |e| {
            error!("WebSocket upgrade failed for subscriber {subscriber_id}: {e}");
            tokio::spawn(async move {
                failed_hub.unregister(subscriber_id).await;
            });
        })
        .on_upgrade(move |socket| {
            handle_socket(socket, state, subscriber_id, mailbox, connection_shutdown)
        });

    Ok(response)
}

async fn handle_socket(
    socket: WebSocket,
    state: StreamState,
    subscriber_id: SubscriberId,
    mailbox: mpsc::Receiver<BroadcastMessage>,
    connection_shutdown: ShutdownCoordinator,
) {
    let server_shutdown = state.shutdown.subscribe_guard();

    let connection = WebSocketConnection::new(
        subscriber_id,
        state.config.clone(),
        state.hub.clone(),
        state.metrics.clone(),
    );

    // Errors are logged and counted inside; they never leave the connection
    let _ = connection
        .handle(socket, mailbox, connection_shutdown, server_shutdown)
        .await;
}

pub async fn health_handler(State(state): State<StreamState>) -> Json<StreamHealth> {
    let stats = state.hub.stats().await;

    Json(StreamHealth {
        status: "healthy",
        stream_id: state.hub.stream_id().to_string(),
        connected_clients: stats.connected_clients,
        last_broadcast_seq: stats.last_broadcast_seq,
        timestamp: Utc::now(),
    })
}
