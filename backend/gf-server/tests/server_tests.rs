mod common;

use common::{KOTOR_BAY, MONTENEGRO, spawn_app, stream, try_spawn_app};

use gf_server::ServerError;
use gf_ws::TickOutcome;

use googletest::prelude::*;
use serde_json::Value;

#[tokio::test]
async fn given_two_streams_when_health_requested_then_both_listed() {
    let app = spawn_app(vec![stream("montenegro", "-53296"), stream("kotor", "kotor")]).await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_that!(body["status"].as_str(), some(eq("healthy")));
    assert_that!(body["service"].as_str(), some(eq("gf-server")));
    assert_that!(body["streams"].as_array().map(Vec::len), some(eq(2)));
    assert_that!(body["streams"][1]["path"].as_str(), some(eq("/ws/kotor")));
}

#[tokio::test]
async fn given_running_server_when_probed_then_live_and_ready() {
    let app = spawn_app(vec![stream("montenegro", "-53296")]).await;

    app.server.get("/live").await.assert_status_ok();
    app.server.get("/ready").await.assert_status_ok();
}

#[tokio::test]
async fn given_shutdown_when_ready_probed_then_unavailable() {
    let app = spawn_app(vec![stream("montenegro", "-53296")]).await;

    app.shutdown.shutdown();

    app.server.get("/ready").await.assert_status_service_unavailable();
    app.server
        .get_websocket("/ws/montenegro")
        .await
        .assert_status_service_unavailable();
}

#[tokio::test]
async fn given_metrics_endpoint_when_scraped_then_text_exposition() {
    let app = spawn_app(vec![stream("montenegro", "-53296")]).await;

    let response = app.server.get("/metrics").await;

    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn given_stream_health_route_when_requested_then_reports_stream() {
    let app = spawn_app(vec![stream("kotor", "kotor")]).await;

    let body: Value = app.server.get("/ws/kotor/health").await.json();

    assert_that!(body["stream_id"].as_str(), some(eq("kotor")));
    assert_that!(body["connected_clients"].as_u64(), some(eq(0)));
}

#[tokio::test]
async fn given_unknown_boundary_when_streams_initialized_then_startup_fails() {
    let (result, _dir) = try_spawn_app(vec![stream("nowhere", "-1")]).await;

    assert!(matches!(result, Err(ServerError::Core(ref e)) if e.is_configuration_error()));
}

#[tokio::test]
async fn given_subscriber_when_report_analyzed_then_delivered_end_to_end() {
    // Given
    let mut app = spawn_app(vec![stream("montenegro", "-53296")]).await;
    let mut ws = app
        .server
        .get_websocket("/ws/montenegro")
        .await
        .into_websocket()
        .await;

    // When
    let seq = app.insert_analyzed_report(MONTENEGRO).await;
    let outcome = app.broadcast_loop("montenegro").tick().await;

    // Then
    assert!(matches!(outcome, TickOutcome::Broadcast { reports: 1, delivered: 1, .. }));
    let envelope: Value = serde_json::from_str(&ws.receive_text().await).unwrap();
    assert_that!(envelope["type"].as_str(), some(eq("reports")));
    assert_that!(envelope["data"]["to_seq"].as_i64(), some(eq(seq)));
    assert_that!(
        envelope["data"]["reports"][0]["analysis"][0]["source"].as_str(),
        some(eq("test-model"))
    );
}

#[tokio::test]
async fn given_two_streams_when_report_in_one_boundary_then_only_that_stream_advances() {
    let mut app = spawn_app(vec![stream("montenegro", "-53296"), stream("kotor", "kotor")]).await;

    let seq = app.insert_analyzed_report(KOTOR_BAY).await;
    let montenegro = app.broadcast_loop("montenegro").tick().await;
    let kotor = app.broadcast_loop("kotor").tick().await;

    assert_that!(montenegro, eq(&TickOutcome::Idle));
    assert!(matches!(kotor, TickOutcome::Broadcast { to_seq, .. } if to_seq == seq));
    assert_that!(app.broadcast_loop("montenegro").cursor(), eq(0));
}
