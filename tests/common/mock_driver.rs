// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Mock DatabaseDriver for testing.
//!
//! Records every open, build, sync and close so tests can assert on the
//! resolver's behavior without touching disk or network.

use replica_connector::driver::{BoxFuture, DriverResult};
use replica_connector::{
    DatabaseDriver, DriverError, RemoteEndpoint, ReplicaConnector, ReplicaOptions,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a handle from the mock driver points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockHandle {
    /// Local file, by path.
    Local(String),
    /// Direct remote connection, by full connection string.
    Remote(String),
    /// Handle on a replica connector, by connector id.
    Replica { id: usize, path: String },
}

impl MockHandle {
    pub fn replica_id(&self) -> Option<usize> {
        match self {
            MockHandle::Replica { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Record of a replica build.
#[derive(Debug, Clone)]
pub struct BuildCall {
    pub id: usize,
    pub local_path: String,
    pub remote_url: String,
    pub auth_token: Option<String>,
    pub sync_interval: Duration,
    pub read_your_writes: bool,
}

/// Shared call log, also held by every replica the driver builds.
#[derive(Default)]
pub struct CallLog {
    local_opens: Mutex<Vec<String>>,
    remote_opens: Mutex<Vec<String>>,
    builds: Mutex<Vec<BuildCall>>,
    syncs: AtomicUsize,
    connects: AtomicUsize,
    closes: Mutex<Vec<usize>>,
    next_id: AtomicUsize,
}

/// Failure injection knobs.
#[derive(Default)]
struct Faults {
    fail_local: bool,
    fail_remote: bool,
    fail_build: bool,
    fail_sync: bool,
    fail_close_paths: HashSet<String>,
    build_delay: Option<Duration>,
}

/// Mock driver that records calls.
#[derive(Clone, Default)]
pub struct MockDriver {
    log: Arc<CallLog>,
    faults: Arc<Mutex<Faults>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Failure Injection
    // =========================================================================

    pub fn fail_local(self) -> Self {
        self.faults.lock().unwrap().fail_local = true;
        self
    }

    pub fn fail_remote(self) -> Self {
        self.faults.lock().unwrap().fail_remote = true;
        self
    }

    pub fn fail_build(self) -> Self {
        self.faults.lock().unwrap().fail_build = true;
        self
    }

    pub fn fail_sync(self) -> Self {
        self.faults.lock().unwrap().fail_sync = true;
        self
    }

    /// Make `close()` fail for the replica built at `path`.
    pub fn fail_close_for(self, path: &str) -> Self {
        self.faults
            .lock()
            .unwrap()
            .fail_close_paths
            .insert(path.to_string());
        self
    }

    /// Sleep inside `open_replica` to widen race windows.
    pub fn with_build_delay(self, delay: Duration) -> Self {
        self.faults.lock().unwrap().build_delay = Some(delay);
        self
    }

    // =========================================================================
    // Query Methods
    // =========================================================================

    pub fn local_opens(&self) -> Vec<String> {
        self.log.local_opens.lock().unwrap().clone()
    }

    pub fn remote_opens(&self) -> Vec<String> {
        self.log.remote_opens.lock().unwrap().clone()
    }

    pub fn builds(&self) -> Vec<BuildCall> {
        self.log.builds.lock().unwrap().clone()
    }

    pub fn build_count(&self) -> usize {
        self.log.builds.lock().unwrap().len()
    }

    pub fn sync_count(&self) -> usize {
        self.log.syncs.load(Ordering::SeqCst)
    }

    pub fn connect_count(&self) -> usize {
        self.log.connects.load(Ordering::SeqCst)
    }

    /// Ids of every replica whose `close()` ran, in call order.
    pub fn closed_ids(&self) -> Vec<usize> {
        self.log.closes.lock().unwrap().clone()
    }

    /// How many times the replica with `id` was closed.
    pub fn close_count(&self, id: usize) -> usize {
        self.closed_ids().iter().filter(|&&c| c == id).count()
    }
}

/// Replica connector built by [`MockDriver`].
pub struct MockReplica {
    id: usize,
    path: String,
    fail_sync: bool,
    fail_close: bool,
    log: Arc<CallLog>,
}

impl ReplicaConnector for MockReplica {
    type Handle = MockHandle;

    fn sync(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.log.syncs.fetch_add(1, Ordering::SeqCst);
            if self.fail_sync {
                return Err(DriverError("remote unreachable".to_string()));
            }
            Ok(())
        })
    }

    fn connect(&self) -> DriverResult<MockHandle> {
        self.log.connects.fetch_add(1, Ordering::SeqCst);
        Ok(MockHandle::Replica {
            id: self.id,
            path: self.path.clone(),
        })
    }

    fn close(self) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            self.log.closes.lock().unwrap().push(self.id);
            if self.fail_close {
                return Err(DriverError("close failed".to_string()));
            }
            Ok(())
        })
    }
}

impl DatabaseDriver for MockDriver {
    type Handle = MockHandle;
    type Replica = MockReplica;

    fn open_local<'a>(&'a self, path: &'a str) -> BoxFuture<'a, MockHandle> {
        Box::pin(async move {
            self.log.local_opens.lock().unwrap().push(path.to_string());
            if self.faults.lock().unwrap().fail_local {
                return Err(DriverError("disk full".to_string()));
            }
            Ok(MockHandle::Local(path.to_string()))
        })
    }

    fn open_remote<'a>(&'a self, endpoint: &'a RemoteEndpoint) -> BoxFuture<'a, MockHandle> {
        Box::pin(async move {
            let dsn = endpoint.connection_string();
            self.log.remote_opens.lock().unwrap().push(dsn.clone());
            if self.faults.lock().unwrap().fail_remote {
                return Err(DriverError("connection refused".to_string()));
            }
            Ok(MockHandle::Remote(dsn))
        })
    }

    fn open_replica(&self, options: ReplicaOptions) -> BoxFuture<'_, MockReplica> {
        Box::pin(async move {
            let (delay, fail_build, fail_sync, fail_close) = {
                let faults = self.faults.lock().unwrap();
                (
                    faults.build_delay,
                    faults.fail_build,
                    faults.fail_sync,
                    faults.fail_close_paths.contains(&options.local_path),
                )
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let id = self.log.next_id.fetch_add(1, Ordering::SeqCst);
            self.log.builds.lock().unwrap().push(BuildCall {
                id,
                local_path: options.local_path.clone(),
                remote_url: options.remote_url.clone(),
                auth_token: options.auth_token.clone(),
                sync_interval: options.sync_interval,
                read_your_writes: options.read_your_writes,
            });
            if fail_build {
                return Err(DriverError("invalid credentials".to_string()));
            }

            Ok(MockReplica {
                id,
                path: options.local_path,
                fail_sync,
                fail_close,
                log: Arc::clone(&self.log),
            })
        })
    }
}
