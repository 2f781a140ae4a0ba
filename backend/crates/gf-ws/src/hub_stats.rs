use serde::Serialize;

/// Point-in-time view of a hub, read under one lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub connected_clients: usize,
    pub last_broadcast_seq: i64,
}
