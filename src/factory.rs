// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Host-facing connection factory.
//!
//! The host framework knows two things about us: a factory it calls with a
//! database path whenever it needs a connection, and a hook it calls once
//! when the process terminates. [`ConnectionFactory`] provides both, routing
//! each path to its role's configuration.

use crate::config::{ConnectorSettings, ENV_AUX_DATABASE_URL};
use crate::driver::{redact_query, DatabaseDriver};
use crate::error::Result;
use crate::platform::ReplicationSupport;
use crate::resolver::{ConnectionResolver, DatabaseRole, ShutdownSummary};
use std::sync::Arc;
use tracing::{info, warn};

/// Entry point for the host: `connect(path)` and `on_terminate()`.
pub struct ConnectionFactory<D: DatabaseDriver> {
    settings: ConnectorSettings,
    resolver: Arc<ConnectionResolver<D>>,
}

impl<D: DatabaseDriver> Clone for ConnectionFactory<D> {
    fn clone(&self) -> Self {
        Self {
            settings: self.settings.clone(),
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl<D: DatabaseDriver> ConnectionFactory<D> {
    /// Build a factory from settings read at startup.
    pub fn new(driver: D, settings: ConnectorSettings, support: ReplicationSupport) -> Self {
        info!(
            primary_remote = settings.primary.is_remote(),
            replication = %support,
            sync_interval_sec = settings.primary.sync_interval_sec,
            "Database connector configured"
        );
        if settings.auxiliary.is_remote() {
            warn!(
                remote = %redact_query(&settings.auxiliary.url),
                "{} is set but the auxiliary database is always local; ignoring",
                ENV_AUX_DATABASE_URL
            );
        }

        Self {
            settings,
            resolver: Arc::new(ConnectionResolver::new(driver, support)),
        }
    }

    /// Open a handle for the database at `db_path`.
    pub async fn connect(&self, db_path: &str) -> Result<D::Handle> {
        let role = DatabaseRole::classify(db_path);
        self.resolver
            .resolve(db_path, self.settings.for_role(role))
            .await
    }

    /// Termination hook: close every replica connector.
    pub async fn on_terminate(&self) -> ShutdownSummary {
        self.resolver.shutdown_all().await
    }

    pub fn settings(&self) -> &ConnectorSettings {
        &self.settings
    }

    pub fn resolver(&self) -> &Arc<ConnectionResolver<D>> {
        &self.resolver
    }
}
