// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Connection resolver.
//!
//! The single owner of the connector registry. Ties together:
//! - The pure selection policy in [`select_mode`]
//! - Embedded replica create-or-reuse (`replica.rs`)
//! - The termination drain (`shutdown.rs`)
//!
//! # Locking
//!
//! One `tokio::sync::Mutex` guards the whole registry, including the
//! expensive replica construction and its initial sync. Resolution happens a
//! handful of times per process, so serialising it is cheap and guarantees no
//! identifier is ever connected twice.
//!
//! # Example
//!
//! ```rust,ignore
//! let resolver = ConnectionResolver::new(LibsqlDriver::new(), ReplicationSupport::detect());
//! let config = ConnectionConfig::remote("libsql://db.turso.io", Some(token));
//!
//! let primary = resolver.resolve("pb_data/data.db", &config).await?;
//! let aux = resolver.resolve("pb_data/auxiliary.db", &config).await?; // always local
//!
//! // At process termination
//! resolver.shutdown_all().await;
//! ```

mod replica;
mod shutdown;
mod types;

pub use shutdown::ShutdownSummary;
pub use types::{select_mode, ConnectionMode, DatabaseRole, AUXILIARY_MARKER};

use crate::config::{ConnectionConfig, ENV_DATABASE_URL};
use crate::driver::{redact_query, DatabaseDriver, RemoteEndpoint, ReplicaOptions};
use crate::error::{ConnectError, Result};
use crate::metrics;
use crate::platform::ReplicationSupport;
use crate::registry::{Registry, RegistryEntry};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Decides how each logical database is opened and owns every replica
/// connector it creates.
pub struct ConnectionResolver<D: DatabaseDriver> {
    /// Storage engine / remote client
    driver: Arc<D>,

    /// Platform capability, fixed at construction
    support: ReplicationSupport,

    /// Registry of resolved identifiers and live connectors
    registry: Mutex<Registry<D::Replica>>,
}

impl<D: DatabaseDriver> ConnectionResolver<D> {
    /// Create a resolver owning `driver`.
    pub fn new(driver: D, support: ReplicationSupport) -> Self {
        Self::with_driver(Arc::new(driver), support)
    }

    /// Create a resolver sharing an existing driver.
    pub fn with_driver(driver: Arc<D>, support: ReplicationSupport) -> Self {
        Self {
            driver,
            support,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Get a reference to the driver.
    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    /// Platform capability this resolver was built with.
    pub fn support(&self) -> ReplicationSupport {
        self.support
    }

    /// Open a handle for `identifier` according to `config`.
    ///
    /// Logs the chosen mode the first time an identifier is seen and stays
    /// silent afterwards. Errors from the driver are returned as-is, never
    /// retried.
    pub async fn resolve(&self, identifier: &str, config: &ConnectionConfig) -> Result<D::Handle> {
        let mut registry = self.registry.lock().await;
        if registry.is_closed() {
            return Err(ConnectError::Shutdown);
        }

        let role = DatabaseRole::classify(identifier);
        let mode = select_mode(role, config, self.support);
        // Latches before the open is attempted: a failed first attempt is
        // reported through its error and retries stay quiet.
        let first = registry.announce_once(identifier);
        metrics::record_resolution(&role.to_string(), mode.as_str());
        debug!(path = %identifier, %role, %mode, first, "Resolving database connection");

        let result = match mode {
            ConnectionMode::Local => {
                if first {
                    announce_local(identifier, role);
                }
                registry.mark(identifier, RegistryEntry::Local);
                self.driver
                    .open_local(identifier)
                    .await
                    .map_err(|source| ConnectError::LocalOpen {
                        path: identifier.to_string(),
                        source,
                    })
            }
            ConnectionMode::Remote => {
                if first {
                    let platform = format!("{}/{}", std::env::consts::OS, std::env::consts::ARCH);
                    info!(
                        path = %identifier,
                        remote = %redact_query(&config.url),
                        %platform,
                        "Connecting to remote libSQL directly (embedded replicas are not supported on this platform)"
                    );
                }
                registry.mark(identifier, RegistryEntry::Remote);
                let endpoint = RemoteEndpoint::new(config.url.clone(), config.auth_token.clone());
                self.driver
                    .open_remote(&endpoint)
                    .await
                    .map_err(|source| ConnectError::RemoteOpen {
                        url: redact_query(&config.url).to_string(),
                        source,
                    })
            }
            ConnectionMode::EmbeddedReplica => {
                let options = replica_options(identifier, config);
                self.replica_handle_locked(&mut registry, identifier, options, first)
                    .await
            }
        };

        if result.is_err() {
            metrics::record_resolution_error(mode.as_str());
        }
        result
    }

    /// What `identifier` was resolved to, if it has been resolved.
    ///
    /// Replicas that were drained by [`shutdown_all`](Self::shutdown_all)
    /// report `None`.
    pub async fn resolved_mode(&self, identifier: &str) -> Option<ConnectionMode> {
        self.registry.lock().await.mode(identifier)
    }

    /// Number of live replica connectors.
    pub async fn live_replicas(&self) -> usize {
        self.registry.lock().await.live_replicas()
    }

    /// Whether [`shutdown_all`](Self::shutdown_all) has run.
    pub async fn is_shut_down(&self) -> bool {
        self.registry.lock().await.is_closed()
    }
}

/// Replica settings for `identifier`: the identifier doubles as local path.
fn replica_options(identifier: &str, config: &ConnectionConfig) -> ReplicaOptions {
    ReplicaOptions {
        local_path: identifier.to_string(),
        remote_url: config.url.clone(),
        auth_token: config.auth_token.clone(),
        sync_interval: config.sync_interval(),
        read_your_writes: true,
    }
}

fn announce_local(identifier: &str, role: DatabaseRole) {
    match role {
        DatabaseRole::Auxiliary => {
            info!(path = %identifier, "Auxiliary database using local SQLite")
        }
        DatabaseRole::Primary => info!(
            path = %identifier,
            "{} not set, using local SQLite for main database",
            ENV_DATABASE_URL
        ),
    }
}
