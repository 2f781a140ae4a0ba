use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable per-stream watermark: the last sequence handed to the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastCursor {
    pub stream_id: String,
    pub last_seq: i64,
    pub updated_at: DateTime<Utc>,
}
