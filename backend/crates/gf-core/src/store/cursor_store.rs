use crate::Result;

use async_trait::async_trait;

/// Durable "last delivered sequence" per broadcast stream.
#[async_trait]
pub trait CursorStore: Send + Sync {
    /// The persisted cursor, or, for a stream seen for the first time, the
    /// store's current maximum sequence (persisted as the seed). A fresh
    /// stream never replays history.
    async fn load(&self, stream_id: &str) -> Result<i64>;

    /// Compare-and-set. Persists `seq` only if it exceeds the stored value and
    /// returns whether anything changed.
    async fn advance(&self, stream_id: &str, seq: i64) -> Result<bool>;
}
