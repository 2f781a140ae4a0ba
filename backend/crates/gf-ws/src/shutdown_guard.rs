use crate::ShutdownCoordinator;

use tokio::sync::broadcast;

/// Waits for a coordinator's signal, including one fired before the guard
/// existed.
pub struct ShutdownGuard {
    coordinator: ShutdownCoordinator,
    shutdown_rx: broadcast::Receiver<()>,
}

impl ShutdownGuard {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            coordinator: coordinator.clone(),
            shutdown_rx: coordinator.subscribe(),
        }
    }

    pub async fn wait(&mut self) {
        if self.coordinator.is_shutdown() {
            return;
        }
        let _ = self.shutdown_rx.recv().await;
    }

    /// Non-blocking check
    pub fn poll_shutdown(&mut self) -> bool {
        self.coordinator.is_shutdown() || self.shutdown_rx.try_recv().is_ok()
    }
}
