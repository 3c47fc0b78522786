//! Shutdown coordination.

use tokio::sync::broadcast;

/// Coordinates graceful shutdown between the server and helper tasks.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Hand out a handle that resolves once shutdown is triggered.
    pub fn handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            rx: self.tx.subscribe(),
        }
    }

    /// Signal every handle.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of the shutdown signal.
pub struct ShutdownHandle {
    rx: broadcast::Receiver<()>,
}

impl ShutdownHandle {
    /// Wait until shutdown is triggered. Also resolves if the coordinator
    /// was dropped without triggering.
    pub async fn wait(mut self) {
        let _ = self.rx.recv().await;
    }
}
