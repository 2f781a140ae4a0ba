use crate::Result as WsErrorResult;

use gf_core::ReportBatch;

use axum::extract::ws::Utf8Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

const ENVELOPE_TYPE: &str = "reports";

/// Outbound frame: `{type: "reports", data: <batch>, timestamp}`.
#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a ReportBatch,
    timestamp: DateTime<Utc>,
}

/// One batch, serialized once and shared by every mailbox.
#[derive(Debug, Clone)]
pub struct BroadcastMessage {
    /// JSON text frame, ready to send on the wire
    pub payload: Utf8Bytes,
    pub count: usize,
    pub from_seq: i64,
    pub to_seq: i64,
}

impl BroadcastMessage {
    #[track_caller]
    pub fn from_batch(batch: &ReportBatch) -> WsErrorResult<Self> {
        let envelope = Envelope {
            kind: ENVELOPE_TYPE,
            data: batch,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&envelope)?;

        Ok(Self {
            payload: Utf8Bytes::from(json),
            count: batch.count,
            from_seq: batch.from_seq,
            to_seq: batch.to_seq,
        })
    }
}
