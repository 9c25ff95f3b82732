//! Graceful shutdown coordination.

use tokio::sync::broadcast;

/// Shutdown signal sender.
pub type ShutdownTx = broadcast::Sender<()>;

/// Shutdown signal receiver.
pub type ShutdownRx = broadcast::Receiver<()>;

/// Create a shutdown channel.
pub fn shutdown_channel() -> (ShutdownTx, ShutdownRx) {
    broadcast::channel(1)
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
///
/// If the handlers cannot be installed this never resolves, and the node
/// can only be stopped through its shutdown channel.
pub async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        tracing::info!("Received SIGINT, initiating shutdown...");
                    }
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM, initiating shutdown...");
                    }
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!("Failed to install signal handlers: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, initiating shutdown..."),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}

/// A guard that holds a shutdown receiver and can check for shutdown.
pub struct ShutdownGuard {
    rx: ShutdownRx,
}

impl ShutdownGuard {
    /// Create a new shutdown guard from a sender.
    pub fn new(tx: &ShutdownTx) -> Self {
        Self { rx: tx.subscribe() }
    }

    /// Wait for the shutdown signal.
    pub async fn wait(&mut self) {
        let _ = self.rx.recv().await;
    }

    /// Check if shutdown has been signaled (non-blocking).
    pub fn is_shutdown(&mut self) -> bool {
        matches!(
            self.rx.try_recv(),
            Ok(_) | Err(broadcast::error::TryRecvError::Closed)
        )
    }
}
