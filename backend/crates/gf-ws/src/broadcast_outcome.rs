use crate::SubscriberId;

/// Why the hub dropped a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// Mailbox full: the subscriber is not keeping up
    SlowConsumer,
    /// Mailbox receiver gone: the connection already ended
    Disconnected,
}

impl EvictionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SlowConsumer => "slow_consumer",
            Self::Disconnected => "disconnected",
        }
    }
}

impl std::fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one `Hub::broadcast`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    pub delivered: usize,
    pub evicted: Vec<(SubscriberId, EvictionReason)>,
}

impl BroadcastOutcome {
    pub fn evicted_count(&self) -> usize {
        self.evicted.len()
    }
}
