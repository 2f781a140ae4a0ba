use crate::{
    BroadcastMessage, BroadcastOutcome, EvictionReason, HubConfig, HubStats, Metrics,
    Result as WsErrorResult, Subscriber, SubscriberId, WsError,
};

use gf_core::{ErrorLocation, ReportBatch};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::RwLock;
use tokio::sync::mpsc::error::TrySendError;

/// Live subscriber set for one stream.
///
/// Membership and `last_broadcast_seq` change only under the write lock, so
/// `stats()` never observes a half-applied broadcast. Nothing here waits on a
/// subscriber: mailboxes are fed with `try_send` and a full one is evicted.
pub struct Hub {
    inner: Arc<RwLock<HubInner>>,
    config: Arc<HubConfig>,
    metrics: Metrics,
}

struct HubInner {
    subscribers: HashMap<SubscriberId, Subscriber>,
    last_broadcast_seq: i64,
}

impl Hub {
    pub fn new(config: HubConfig, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HubInner {
                subscribers: HashMap::new(),
                last_broadcast_seq: 0,
            })),
            config: Arc::new(config),
            metrics,
        }
    }

    pub fn stream_id(&self) -> &str {
        &self.config.stream_id
    }

    /// Add a subscriber. It receives only batches broadcast after this call.
    pub async fn register(&self, subscriber: Subscriber) -> WsErrorResult<()> {
        let mut inner = self.inner.write().await;

        let current = inner.subscribers.len();
        if current >= self.config.max_subscribers {
            self.metrics.subscriber_rejected(self.stream_id());
            return Err(WsError::ConnectionLimitExceeded {
                current,
                max: self.config.max_subscribers,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let id = subscriber.id();
        inner.subscribers.insert(id, subscriber);
        self.metrics.subscriber_registered(self.stream_id());

        debug!(
            "Subscriber {} registered on stream {} ({} total)",
            id,
            self.stream_id(),
            inner.subscribers.len()
        );

        Ok(())
    }

    /// Remove a subscriber and release its mailbox. Idempotent; returns
    /// whether it was still registered.
    pub async fn unregister(&self, id: SubscriberId) -> bool {
        let mut inner = self.inner.write().await;

        let removed = inner.subscribers.remove(&id).is_some();
        if removed {
            self.metrics.subscriber_unregistered(self.stream_id());
            debug!(
                "Subscriber {} unregistered from stream {} ({} remaining)",
                id,
                self.stream_id(),
                inner.subscribers.len()
            );
        }

        removed
    }

    /// Serialize the batch once and offer it to every live mailbox.
    ///
    /// A full mailbox evicts that subscriber only: it is removed, its
    /// connection is signalled to stop, and the others are unaffected. An
    /// empty batch is a no-op.
    pub async fn broadcast(&self, batch: &ReportBatch) -> WsErrorResult<BroadcastOutcome> {
        if batch.is_empty() {
            return Ok(BroadcastOutcome::default());
        }

        let message = BroadcastMessage::from_batch(batch)?;

        let mut inner = self.inner.write().await;
        let mut outcome = BroadcastOutcome::default();

        for (id, subscriber) in &inner.subscribers {
            match subscriber.mailbox().try_send(message.clone()) {
                Ok(()) => outcome.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    outcome.evicted.push((*id, EvictionReason::SlowConsumer));
                }
                Err(TrySendError::Closed(_)) => {
                    outcome.evicted.push((*id, EvictionReason::Disconnected));
                }
            }
        }

        for (id, reason) in &outcome.evicted {
            if let Some(subscriber) = inner.subscribers.remove(id) {
                subscriber.shutdown().shutdown();
                self.metrics.subscriber_unregistered(self.stream_id());
                self.metrics.subscriber_evicted(self.stream_id(), reason.as_str());

                match reason {
                    EvictionReason::SlowConsumer => warn!(
                        "Evicted slow subscriber {} from stream {} (mailbox full)",
                        id,
                        self.stream_id()
                    ),
                    EvictionReason::Disconnected => debug!(
                        "Dropped disconnected subscriber {} from stream {}",
                        id,
                        self.stream_id()
                    ),
                }
            }
        }

        inner.last_broadcast_seq = inner.last_broadcast_seq.max(batch.to_seq);

        info!(
            "Broadcast {} reports (seq {}-{}) on stream {} to {} subscribers",
            batch.count,
            batch.from_seq,
            batch.to_seq,
            self.stream_id(),
            outcome.delivered
        );

        Ok(outcome)
    }

    pub async fn stats(&self) -> HubStats {
        let inner = self.inner.read().await;

        HubStats {
            connected_clients: inner.subscribers.len(),
            last_broadcast_seq: inner.last_broadcast_seq,
        }
    }

    pub async fn is_registered(&self, id: SubscriberId) -> bool {
        self.inner.read().await.subscribers.contains_key(&id)
    }

    /// Signal every connection to stop. Used on server shutdown.
    pub async fn close_all(&self) {
        let inner = self.inner.read().await;
        for subscriber in inner.subscribers.values() {
            subscriber.shutdown().shutdown();
        }
    }
}

impl Clone for Hub {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: Arc::clone(&self.config),
            metrics: self.metrics.clone(),
        }
    }
}
