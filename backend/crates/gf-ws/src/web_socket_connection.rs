use crate::{
    BroadcastMessage, ConnectionConfig, Hub, Metrics, Result as WsErrorResult, ShutdownCoordinator,
    ShutdownGuard, SubscriberId, WsError,
};

use gf_core::ErrorLocation;

use std::fmt::Display;
use std::panic::Location;

use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures::{Sink, SinkExt, Stream, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at, timeout};

/// One subscriber's socket.
///
/// Two duties share the subscriber's shutdown signal: the writer drains the
/// mailbox and pings, the reader enforces liveness. Whichever ends first
/// fires the signal and the other follows. The hub firing it (eviction) or
/// server shutdown ends both. Cleanup unregisters exactly once.
pub struct WebSocketConnection {
    subscriber_id: SubscriberId,
    config: ConnectionConfig,
    hub: Hub,
    metrics: Metrics,
}

impl WebSocketConnection {
    pub fn new(
        subscriber_id: SubscriberId,
        config: ConnectionConfig,
        hub: Hub,
        metrics: Metrics,
    ) -> Self {
        Self {
            subscriber_id,
            config,
            hub,
            metrics,
        }
    }

    /// Run until either duty ends, then unregister.
    pub async fn handle(
        self,
        socket: WebSocket,
        mailbox: mpsc::Receiver<BroadcastMessage>,
        connection_shutdown: ShutdownCoordinator,
        server_shutdown: ShutdownGuard,
    ) -> WsErrorResult<()> {
        let (ws_sender, ws_receiver) = socket.split();
        self.serve(
            ws_sender,
            ws_receiver,
            mailbox,
            connection_shutdown,
            server_shutdown,
        )
        .await
    }

    /// Both duties over an already split transport.
    pub(crate) async fn serve<Tx, Rx, E>(
        self,
        ws_sender: Tx,
        ws_receiver: Rx,
        mailbox: mpsc::Receiver<BroadcastMessage>,
        connection_shutdown: ShutdownCoordinator,
        server_shutdown: ShutdownGuard,
    ) -> WsErrorResult<()>
    where
        Tx: Sink<Message> + Unpin + Send + 'static,
        Tx::Error: Display + Send,
        Rx: Stream<Item = Result<Message, E>> + Unpin,
        E: Display,
    {
        let stream_id = self.hub.stream_id().to_string();
        info!(
            "Subscriber {} connected to stream {}",
            self.subscriber_id, stream_id
        );

        let writer = Writer {
            subscriber_id: self.subscriber_id,
            stream_id: stream_id.clone(),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
        };
        let writer_shutdown = connection_shutdown.clone();
        let writer_guard = connection_shutdown.subscribe_guard();
        let send_task = tokio::spawn(async move {
            let result = writer.run(ws_sender, mailbox, writer_guard).await;
            writer_shutdown.shutdown();
            result
        });

        let read_result = self
            .read_loop(
                ws_receiver,
                connection_shutdown.subscribe_guard(),
                server_shutdown,
            )
            .await;
        connection_shutdown.shutdown();

        let write_result = match send_task.await {
            Ok(result) => result,
            Err(e) => Err(WsError::Internal {
                message: format!("writer task failed: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }),
        };

        // Single cleanup path
        self.hub.unregister(self.subscriber_id).await;

        let result = read_result.and(write_result);
        let reason = match &result {
            Ok(()) => "normal",
            Err(e) => e.reason(),
        };
        self.metrics.connection_closed(&stream_id, reason);

        match &result {
            Ok(()) => info!(
                "Subscriber {} disconnected from stream {}",
                self.subscriber_id, stream_id
            ),
            Err(e) => warn!(
                "Subscriber {} dropped from stream {}: {}",
                self.subscriber_id, stream_id, e
            ),
        }

        result
    }

    /// Liveness: some inbound frame must arrive within the pong timeout.
    /// Pings from the peer are answered by the websocket layer.
    async fn read_loop<Rx, E>(
        &self,
        mut ws_receiver: Rx,
        mut connection_guard: ShutdownGuard,
        mut server_guard: ShutdownGuard,
    ) -> WsErrorResult<()>
    where
        Rx: Stream<Item = Result<Message, E>> + Unpin,
        E: Display,
    {
        let pong_timeout = self.config.pong_timeout;

        loop {
            tokio::select! {
                _ = connection_guard.wait() => return Ok(()),

                _ = server_guard.wait() => {
                    debug!("Closing subscriber {} for server shutdown", self.subscriber_id);
                    return Ok(());
                }

                frame = timeout(pong_timeout, ws_receiver.next()) => match frame {
                    Err(_) => {
                        return Err(WsError::HeartbeatTimeout {
                            timeout_ms: pong_timeout.as_millis(),
                            location: ErrorLocation::from(Location::caller()),
                        });
                    }
                    Ok(None) | Ok(Some(Ok(Message::Close(_)))) => return Ok(()),
                    Ok(Some(Err(e))) => {
                        return Err(WsError::connection_closed(format!("read failed: {e}")));
                    }
                    Ok(Some(Ok(_))) => {}
                }
            }
        }
    }
}

struct Writer {
    subscriber_id: SubscriberId,
    stream_id: String,
    config: ConnectionConfig,
    metrics: Metrics,
}

impl Writer {
    async fn run<Tx>(
        self,
        mut ws_sender: Tx,
        mut mailbox: mpsc::Receiver<BroadcastMessage>,
        mut shutdown: ShutdownGuard,
    ) -> WsErrorResult<()>
    where
        Tx: Sink<Message> + Unpin,
        Tx::Error: Display,
    {
        let ping_interval = self.config.ping_interval;
        let mut ping = interval_at(Instant::now() + ping_interval, ping_interval);

        let result = loop {
            tokio::select! {
                biased;

                _ = shutdown.wait() => break Ok(()),

                message = mailbox.recv() => match message {
                    Some(message) => {
                        if let Err(e) = self.send(&mut ws_sender, Message::Text(message.payload)).await {
                            break Err(e);
                        }
                        self.metrics.frame_sent(&self.stream_id);
                        debug!(
                            "Sent seq {}-{} to subscriber {}",
                            message.from_seq, message.to_seq, self.subscriber_id
                        );
                    }
                    // Mailbox released by the hub
                    None => break Ok(()),
                },

                _ = ping.tick() => {
                    if let Err(e) = self.send(&mut ws_sender, Message::Ping(Bytes::new())).await {
                        break Err(e);
                    }
                }
            }
        };

        let _ = timeout(self.config.write_timeout, ws_sender.close()).await;

        result
    }

    async fn send<Tx>(&self, ws_sender: &mut Tx, message: Message) -> WsErrorResult<()>
    where
        Tx: Sink<Message> + Unpin,
        Tx::Error: Display,
    {
        match timeout(self.config.write_timeout, ws_sender.send(message)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(WsError::connection_closed(format!("write failed: {e}"))),
            Err(_) => Err(WsError::WriteTimeout {
                timeout_ms: self.config.write_timeout.as_millis(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
