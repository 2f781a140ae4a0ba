use crate::{ServerState, health};

use gf_ws::{StreamState, stream_router};

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router: server-wide probes plus one websocket and
/// health route pair per stream.
pub fn build_router(state: ServerState, streams: Vec<(String, StreamState)>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/metrics", get(health::metrics))
        .with_state(state);

    for (path, stream_state) in streams {
        router = router.merge(stream_router(&path, stream_state));
    }

    // CORS middleware (allow all origins for WebSocket)
    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
