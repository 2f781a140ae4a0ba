#![allow(dead_code)]

use crate::common::test_server::TEST_STREAM_PATH;

use axum_test::{TestServer, TestWebSocket};
use serde_json::Value;

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
}

impl WsTestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let ws = server
            .get_websocket(TEST_STREAM_PATH)
            .await
            .into_websocket()
            .await;

        Self { ws }
    }

    /// Receive the next frame and parse it as a JSON envelope
    pub async fn receive_envelope(&mut self) -> Value {
        let text = self.ws.receive_text().await;
        serde_json::from_str(&text).expect("Frame should be JSON")
    }

    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    pub async fn close(self) {
        self.ws.close().await;
    }
}

/// Sequences carried by an envelope, in order
pub fn envelope_seqs(envelope: &Value) -> Vec<i64> {
    envelope["data"]["reports"]
        .as_array()
        .map(|reports| {
            reports
                .iter()
                .filter_map(|pair| pair["report"]["seq"].as_i64())
                .collect()
        })
        .unwrap_or_default()
}
