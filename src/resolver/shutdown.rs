//! Termination drain.
//!
//! Invoked once by the host during graceful shutdown. Every live replica is
//! closed in turn; a failing close is logged and the drain moves on, so one
//! stuck connector cannot keep the others open or change the exit code.

use super::ConnectionResolver;
use crate::driver::{DatabaseDriver, ReplicaConnector};
use crate::error::ConnectError;
use crate::metrics;
use tracing::{info, warn};

/// Outcome of [`ConnectionResolver::shutdown_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownSummary {
    /// Connectors closed cleanly.
    pub closed: usize,
    /// Connectors whose close reported an error.
    pub failed: usize,
}

impl ShutdownSummary {
    /// Total connectors drained.
    pub fn total(&self) -> usize {
        self.closed + self.failed
    }
}

impl<D: DatabaseDriver> ConnectionResolver<D> {
    /// Close every live replica connector.
    ///
    /// Best-effort: close errors are logged, never returned. With no live
    /// connectors this is a no-op. Afterwards the resolver refuses new
    /// resolutions with [`ConnectError::Shutdown`].
    pub async fn shutdown_all(&self) -> ShutdownSummary {
        let mut registry = self.registry.lock().await;
        registry.close();

        let replicas = registry.drain_replicas();
        let mut summary = ShutdownSummary::default();

        for (path, replica) in replicas {
            info!(path = %path, "Closing embedded replica connector");
            match replica.close().await {
                Ok(()) => {
                    summary.closed += 1;
                    metrics::record_replica_closed(true);
                }
                Err(source) => {
                    summary.failed += 1;
                    metrics::record_replica_closed(false);
                    let err = ConnectError::Close { path, source };
                    warn!(error = %err, "Error closing replica connector");
                }
            }
        }

        metrics::set_live_replicas(registry.live_replicas());
        if summary.total() > 0 {
            info!(
                closed = summary.closed,
                failed = summary.failed,
                "Replica connectors closed"
            );
        }
        summary
    }
}
