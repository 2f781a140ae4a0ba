pub mod broadcast_loop;
pub mod broadcast_message;
pub mod broadcast_outcome;
pub mod connection_config;
pub mod error;
pub mod hub;
pub mod hub_config;
pub mod hub_stats;
pub mod metrics;
pub mod metrics_timer;
pub mod report_feed;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod stream_state;
pub mod subscriber;
pub mod subscriber_id;
pub mod web_socket_connection;

pub use broadcast_loop::{BroadcastLoop, BroadcastLoopConfig, TickOutcome};
pub use broadcast_message::BroadcastMessage;
pub use broadcast_outcome::{BroadcastOutcome, EvictionReason};
pub use connection_config::ConnectionConfig;
pub use error::{Result, WsError};
pub use hub::Hub;
pub use hub_config::HubConfig;
pub use hub_stats::HubStats;
pub use metrics::Metrics;
pub use metrics_timer::MetricsTimer;
pub use report_feed::ReportFeed;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use stream_state::{StreamHealth, StreamState, handler, health_handler, stream_router};
pub use subscriber::Subscriber;
pub use subscriber_id::SubscriberId;
pub use web_socket_connection::WebSocketConnection;

#[cfg(test)]
mod tests;
