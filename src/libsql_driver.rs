// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! libSQL implementation of the driver traits.
//!
//! - Local: `Builder::new_local(path)`
//! - Remote: `Builder::new_remote(url, token)`
//! - Embedded replica: `Builder::new_remote_replica(path, url, token)` with the
//!   configured sync interval and read-your-writes enabled

use crate::driver::{
    BoxFuture, DatabaseDriver, DriverError, DriverResult, RemoteEndpoint, ReplicaConnector,
    ReplicaOptions,
};
use libsql::{Builder, Connection, Database};
use tracing::debug;

impl From<libsql::Error> for DriverError {
    fn from(e: libsql::Error) -> Self {
        DriverError(e.to_string())
    }
}

/// A libSQL connection plus, for local and remote handles, the database that
/// backs it.
///
/// Replica handles carry no database: the connector stays owned by the
/// resolver and is only released at shutdown.
pub struct LibsqlHandle {
    conn: Connection,
    owner: Option<Database>,
}

impl LibsqlHandle {
    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Whether dropping this handle releases the database too.
    pub fn owns_database(&self) -> bool {
        self.owner.is_some()
    }

    fn owned(db: Database) -> DriverResult<Self> {
        let conn = db.connect()?;
        Ok(Self {
            conn,
            owner: Some(db),
        })
    }
}

/// Embedded replica connector backed by a libSQL remote replica database.
pub struct LibsqlReplica {
    db: Database,
}

impl ReplicaConnector for LibsqlReplica {
    type Handle = LibsqlHandle;

    fn sync(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.db.sync().await?;
            debug!("Replica synced");
            Ok(())
        })
    }

    fn connect(&self) -> DriverResult<LibsqlHandle> {
        Ok(LibsqlHandle {
            conn: self.db.connect()?,
            owner: None,
        })
    }

    fn close(self) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            // Dropping the database stops the periodic sync task and releases
            // the local file.
            drop(self.db);
            Ok(())
        })
    }
}

/// Stateless libSQL driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibsqlDriver;

impl LibsqlDriver {
    pub fn new() -> Self {
        Self
    }
}

impl DatabaseDriver for LibsqlDriver {
    type Handle = LibsqlHandle;
    type Replica = LibsqlReplica;

    fn open_local<'a>(&'a self, path: &'a str) -> BoxFuture<'a, LibsqlHandle> {
        Box::pin(async move {
            let db = Builder::new_local(path).build().await?;
            LibsqlHandle::owned(db)
        })
    }

    fn open_remote<'a>(&'a self, endpoint: &'a RemoteEndpoint) -> BoxFuture<'a, LibsqlHandle> {
        Box::pin(async move {
            let token = endpoint.auth_token.clone().unwrap_or_default();
            let db = Builder::new_remote(endpoint.url.clone(), token)
                .build()
                .await?;
            LibsqlHandle::owned(db)
        })
    }

    fn open_replica(&self, options: ReplicaOptions) -> BoxFuture<'_, LibsqlReplica> {
        Box::pin(async move {
            let db = Builder::new_remote_replica(
                options.local_path,
                options.remote_url,
                options.auth_token.unwrap_or_default(),
            )
            .sync_interval(options.sync_interval)
            .read_your_writes(options.read_your_writes)
            .build()
            .await?;
            Ok(LibsqlReplica { db })
        })
    }
}
