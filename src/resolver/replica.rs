// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Embedded replica lifecycle: create once, sync once, reuse forever.
//!
//! Constructing a replica opens local storage, negotiates with the remote and
//! arms the periodic sync timer, so it happens at most once per identifier.
//! Later requests get a fresh handle on the same connector.
//!
//! A failed initial sync is tolerated: the replica is registered anyway and
//! serves a possibly stale local copy until its next periodic sync succeeds.
//! A failed construction is not: it propagates with no local fallback.

use super::ConnectionResolver;
use crate::driver::{redact_query, DatabaseDriver, ReplicaConnector, ReplicaOptions};
use crate::error::{ConnectError, Result};
use crate::metrics;
use crate::registry::Registry;
use std::time::Instant;
use tracing::{debug, info, warn};

impl<D: DatabaseDriver> ConnectionResolver<D> {
    /// Get a handle on the replica for `identifier`, creating the connector
    /// (and running its initial sync) if none is registered yet.
    ///
    /// Takes the registry lock for the whole call. Bypasses the selection
    /// policy: callers that want the policy applied use
    /// [`resolve`](Self::resolve).
    pub async fn replica_handle(
        &self,
        identifier: &str,
        options: ReplicaOptions,
    ) -> Result<D::Handle> {
        let mut registry = self.registry.lock().await;
        if registry.is_closed() {
            return Err(ConnectError::Shutdown);
        }
        let first = registry.announce_once(identifier);
        self.replica_handle_locked(&mut registry, identifier, options, first)
            .await
    }

    /// Create-or-reuse with the registry lock already held.
    pub(super) async fn replica_handle_locked(
        &self,
        registry: &mut Registry<D::Replica>,
        identifier: &str,
        options: ReplicaOptions,
        announce: bool,
    ) -> Result<D::Handle> {
        // Fast path: connector already registered
        if let Some(replica) = registry.replica(identifier) {
            debug!(path = %identifier, "Reusing embedded replica");
            metrics::record_replica_reused();
            return replica.connect().map_err(|source| ConnectError::Handle {
                path: identifier.to_string(),
                source,
            });
        }

        if announce {
            info!(
                path = %identifier,
                local = %options.local_path,
                remote = %redact_query(&options.remote_url),
                sync_interval = ?options.sync_interval,
                "Creating embedded replica"
            );
        }

        let remote_url = redact_query(&options.remote_url).to_string();
        let start = Instant::now();
        let replica = match self.driver.open_replica(options).await {
            Ok(replica) => {
                metrics::record_replica_created(true, start.elapsed());
                replica
            }
            Err(source) => {
                metrics::record_replica_created(false, start.elapsed());
                return Err(ConnectError::ReplicaBuild {
                    path: identifier.to_string(),
                    url: remote_url,
                    source,
                });
            }
        };

        debug!(path = %identifier, "Performing initial sync");
        let sync_start = Instant::now();
        match replica.sync().await {
            Ok(()) => {
                metrics::record_initial_sync(true, sync_start.elapsed());
                info!(
                    path = %identifier,
                    elapsed_ms = sync_start.elapsed().as_millis() as u64,
                    "Initial sync complete"
                );
            }
            Err(e) => {
                metrics::record_initial_sync(false, sync_start.elapsed());
                warn!(
                    path = %identifier,
                    error = %e,
                    "Initial sync failed, serving local copy until next periodic sync"
                );
            }
        }

        // Register before handing out the handle so a connect failure still
        // leaves the connector owned (and closed at shutdown).
        let handle = replica.connect();
        registry.insert_replica(identifier, replica);
        metrics::set_live_replicas(registry.live_replicas());

        handle.map_err(|source| ConnectError::Handle {
            path: identifier.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::driver::{
        BoxFuture, DatabaseDriver, DriverError, DriverResult, RemoteEndpoint, ReplicaConnector,
        ReplicaOptions,
    };
    use crate::error::ConnectError;
    use crate::platform::ReplicationSupport;
    use crate::resolver::{ConnectionMode, ConnectionResolver};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct Counters {
        builds: AtomicUsize,
        syncs: AtomicUsize,
        connects: AtomicUsize,
    }

    struct FlakyReplica {
        counters: Arc<Counters>,
        fail_sync: bool,
        fail_connect: bool,
    }

    impl ReplicaConnector for FlakyReplica {
        type Handle = usize;

        fn sync(&self) -> BoxFuture<'_, ()> {
            self.counters.syncs.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail_sync;
            Box::pin(async move {
                if fail {
                    Err(DriverError("remote unreachable".into()))
                } else {
                    Ok(())
                }
            })
        }

        fn connect(&self) -> DriverResult<usize> {
            if self.fail_connect {
                return Err(DriverError("connection limit".into()));
            }
            Ok(self.counters.connects.fetch_add(1, Ordering::SeqCst) + 1)
        }

        fn close(self) -> BoxFuture<'static, ()> {
            Box::pin(async { Ok(()) })
        }
    }

    #[derive(Default)]
    struct FlakyDriver {
        counters: Arc<Counters>,
        fail_build: bool,
        fail_sync: bool,
        fail_connect: bool,
    }

    impl DatabaseDriver for FlakyDriver {
        type Handle = usize;
        type Replica = FlakyReplica;

        fn open_local<'a>(&'a self, _path: &'a str) -> BoxFuture<'a, usize> {
            Box::pin(async { Ok(0) })
        }

        fn open_remote<'a>(&'a self, _endpoint: &'a RemoteEndpoint) -> BoxFuture<'a, usize> {
            Box::pin(async { Ok(0) })
        }

        fn open_replica(&self, _options: ReplicaOptions) -> BoxFuture<'_, FlakyReplica> {
            self.counters.builds.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                if self.fail_build {
                    return Err(DriverError("bad token".into()));
                }
                Ok(FlakyReplica {
                    counters: self.counters.clone(),
                    fail_sync: self.fail_sync,
                    fail_connect: self.fail_connect,
                })
            })
        }
    }

    fn options() -> ReplicaOptions {
        ReplicaOptions {
            local_path: "pb_data/data.db".into(),
            remote_url: "libsql://example.turso.io".into(),
            auth_token: Some("tok123".into()),
            sync_interval: Duration::from_secs(60),
            read_your_writes: true,
        }
    }

    #[tokio::test]
    async fn test_create_then_reuse() {
        let resolver = ConnectionResolver::new(FlakyDriver::default(), ReplicationSupport::Supported);

        let first = resolver.replica_handle("pb_data/data.db", options()).await.unwrap();
        let second = resolver.replica_handle("pb_data/data.db", options()).await.unwrap();

        let counters = &resolver.driver().counters;
        assert_eq!(counters.builds.load(Ordering::SeqCst), 1);
        assert_eq!(counters.syncs.load(Ordering::SeqCst), 1);
        // Each call gets its own handle
        assert_eq!((first, second), (1, 2));
    }

    #[tokio::test]
    async fn test_initial_sync_failure_is_not_fatal() {
        let driver = FlakyDriver {
            fail_sync: true,
            ..Default::default()
        };
        let resolver = ConnectionResolver::new(driver, ReplicationSupport::Supported);

        let handle = resolver.replica_handle("pb_data/data.db", options()).await;
        assert!(handle.is_ok());
        assert_eq!(resolver.live_replicas().await, 1);
        assert_eq!(
            resolver.resolved_mode("pb_data/data.db").await,
            Some(ConnectionMode::EmbeddedReplica)
        );

        // Reuse does not retry the initial sync
        resolver.replica_handle("pb_data/data.db", options()).await.unwrap();
        assert_eq!(resolver.driver().counters.syncs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_build_failure_propagates_without_registering() {
        let driver = FlakyDriver {
            fail_build: true,
            ..Default::default()
        };
        let resolver = ConnectionResolver::new(driver, ReplicationSupport::Supported);

        let err = resolver
            .replica_handle("pb_data/data.db", options())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ConnectError::ReplicaBuild { ref url, .. } if url == "libsql://example.turso.io"
        ));
        assert_eq!(resolver.live_replicas().await, 0);
        assert_eq!(resolver.resolved_mode("pb_data/data.db").await, None);

        // A later attempt tries to build again
        let _ = resolver.replica_handle("pb_data/data.db", options()).await;
        assert_eq!(resolver.driver().counters.builds.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_connect_failure_keeps_connector_registered() {
        let driver = FlakyDriver {
            fail_connect: true,
            ..Default::default()
        };
        let resolver = ConnectionResolver::new(driver, ReplicationSupport::Supported);

        let err = resolver
            .replica_handle("pb_data/data.db", options())
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectError::Handle { .. }));
        assert_eq!(resolver.live_replicas().await, 1);

        let summary = resolver.shutdown_all().await;
        assert_eq!(summary.closed, 1);
    }
}
