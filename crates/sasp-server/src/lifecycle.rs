//! Server lifecycle and shutdown signalling
//!
//! A single [`ServerLifecycle`] is created at startup and handed to every
//! component. Shutting it down cancels the underlying token, which wakes
//! every task that is selecting on [`ServerLifecycle::cancelled`] or on a
//! child token derived from it.

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Observable shutdown signal shared by the listener, connections and HTTP surface
#[derive(Debug, Clone, Default)]
pub struct ServerLifecycle {
    cancel: CancellationToken,
}

impl ServerLifecycle {
    /// Create a lifecycle that is running
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
        }
    }

    /// Request shutdown of the whole server
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!("Server shutdown requested");
        }
        self.cancel.cancel();
    }

    /// Whether shutdown has been requested
    pub fn is_shutting_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once shutdown is requested
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }

    /// Token cancelled together with the server, but cancellable on its own
    ///
    /// Each connection gets a child so it can be torn down without
    /// affecting the rest of the server.
    pub fn child_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    /// Owned future for APIs that need `'static` shutdown signals
    pub async fn cancelled_owned(self) {
        self.cancel.cancelled_owned().await
    }
}

/// Shut the lifecycle down on Ctrl+C or SIGTERM
pub fn install_signal_handlers(lifecycle: ServerLifecycle) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate => {
                tracing::info!("Received SIGTERM, initiating shutdown...");
            }
            _ = lifecycle.cancelled() => return,
        }

        lifecycle.shutdown();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_wakes_waiters() {
        let lifecycle = ServerLifecycle::new();
        let waiter = {
            let lifecycle = lifecycle.clone();
            tokio::spawn(async move { lifecycle.cancelled().await })
        };

        assert!(!lifecycle.is_shutting_down());
        lifecycle.shutdown();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(lifecycle.is_shutting_down());
    }

    #[tokio::test]
    async fn test_child_token_follows_parent() {
        let lifecycle = ServerLifecycle::new();
        let child = lifecycle.child_token();
        let sibling = lifecycle.child_token();

        // Cancelling a child leaves the server running
        sibling.cancel();
        assert!(!lifecycle.is_shutting_down());
        assert!(!child.is_cancelled());

        lifecycle.shutdown();
        assert!(child.is_cancelled());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let lifecycle = ServerLifecycle::new();
        lifecycle.shutdown();
        lifecycle.shutdown();
        assert!(lifecycle.is_shutting_down());
    }
}
