//! Shutdown coordination for the gateway.

use tokio::sync::broadcast;

/// One-shot stop signal for the server and any task that must drain with it.
///
/// `startup::run` triggers it on SIGINT/SIGTERM; `HttpServer::run` holds a
/// receiver and stops accepting when it fires.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Subscribers that join later miss it.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
