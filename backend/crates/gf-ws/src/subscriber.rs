use crate::{BroadcastMessage, ShutdownCoordinator, SubscriberId};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// A live subscriber as the hub sees it.
///
/// The hub holds the only sender of the mailbox. Removing the subscriber from
/// the hub drops it, which closes the mailbox.
#[derive(Debug)]
pub struct Subscriber {
    id: SubscriberId,
    mailbox: mpsc::Sender<BroadcastMessage>,
    connected_at: DateTime<Utc>,
    shutdown: ShutdownCoordinator,
}

impl Subscriber {
    /// New subscriber with a bounded mailbox of `capacity` batches. The
    /// receiver goes to the connection's writer.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<BroadcastMessage>) {
        let (mailbox, receiver) = mpsc::channel(capacity.max(1));

        let subscriber = Self {
            id: SubscriberId::new(),
            mailbox,
            connected_at: Utc::now(),
            shutdown: ShutdownCoordinator::new(),
        };

        (subscriber, receiver)
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Per-connection stop signal, fired by the hub on eviction.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    pub(crate) fn mailbox(&self) -> &mpsc::Sender<BroadcastMessage> {
        &self.mailbox
    }
}
