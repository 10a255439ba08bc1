// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Storage driver integration traits.
//!
//! Defines what the resolver needs from the underlying storage engine and the
//! remote client. Both are black boxes: the resolver only decides *which* of
//! them to open and owns the lifecycle of replica connectors.
//!
//! # Example
//!
//! ```rust
//! use replica_connector::driver::{
//!     BoxFuture, DatabaseDriver, DriverResult, RemoteEndpoint, ReplicaConnector, ReplicaOptions,
//! };
//!
//! struct Replica;
//!
//! impl ReplicaConnector for Replica {
//!     type Handle = ();
//!
//!     fn sync(&self) -> BoxFuture<'_, ()> {
//!         Box::pin(async { Ok(()) })
//!     }
//!
//!     fn connect(&self) -> DriverResult<()> {
//!         Ok(())
//!     }
//!
//!     fn close(self) -> BoxFuture<'static, ()> {
//!         Box::pin(async { Ok(()) })
//!     }
//! }
//!
//! struct Driver;
//!
//! impl DatabaseDriver for Driver {
//!     type Handle = ();
//!     type Replica = Replica;
//!
//!     fn open_local<'a>(&'a self, _path: &'a str) -> BoxFuture<'a, ()> {
//!         Box::pin(async { Ok(()) })
//!     }
//!
//!     fn open_remote<'a>(&'a self, _endpoint: &'a RemoteEndpoint) -> BoxFuture<'a, ()> {
//!         Box::pin(async { Ok(()) })
//!     }
//!
//!     fn open_replica(&self, _options: ReplicaOptions) -> BoxFuture<'_, Replica> {
//!         Box::pin(async { Ok(Replica) })
//!     }
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Result type for driver operations.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Type alias for boxed async futures (reduces trait signature complexity).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = DriverResult<T>> + Send + 'a>>;

/// Simplified error for driver operations.
#[derive(Debug, Clone)]
pub struct DriverError(pub String);

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for DriverError {}

/// A remote endpoint for a direct (remote-only) connection.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    /// Endpoint URL as configured, e.g. `libsql://db.turso.io`.
    pub url: String,
    /// Bearer token, if any.
    pub auth_token: Option<String>,
}

impl RemoteEndpoint {
    pub fn new(url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            url: url.into(),
            auth_token,
        }
    }

    /// Connection string with the token carried as an `authToken` query
    /// parameter.
    ///
    /// Uses `&` when the URL already has a query component, `?` otherwise.
    /// A missing or empty token leaves the URL untouched.
    ///
    /// For drivers that take a single DSN. [`LibsqlDriver`](crate::LibsqlDriver)
    /// passes `url` and `auth_token` to the client separately and never
    /// builds this string.
    pub fn connection_string(&self) -> String {
        match self.auth_token.as_deref() {
            Some(token) if !token.is_empty() => {
                let separator = if self.url.contains('?') { '&' } else { '?' };
                format!("{}{}authToken={}", self.url, separator, token)
            }
            _ => self.url.clone(),
        }
    }
}

/// `url` without its query component, for logs and error messages.
///
/// Operators sometimes put `authToken=` in the configured URL itself.
pub fn redact_query(url: &str) -> &str {
    match url.find('?') {
        Some(idx) => &url[..idx],
        None => url,
    }
}

impl fmt::Debug for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteEndpoint")
            .field("url", &self.url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything needed to construct an embedded replica connector.
#[derive(Clone)]
pub struct ReplicaOptions {
    /// Local file backing the replica.
    pub local_path: String,
    /// Remote primary to sync from.
    pub remote_url: String,
    /// Bearer token for the remote.
    pub auth_token: Option<String>,
    /// Period of the connector's background sync.
    pub sync_interval: Duration,
    /// Reads observe the caller's own writes before the next sync.
    pub read_your_writes: bool,
}

impl fmt::Debug for ReplicaOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplicaOptions")
            .field("local_path", &self.local_path)
            .field("remote_url", &self.remote_url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("sync_interval", &self.sync_interval)
            .field("read_your_writes", &self.read_your_writes)
            .finish()
    }
}

/// A live background replication connector.
///
/// Owned exclusively by the resolver's registry. Handles obtained through
/// [`connect`](Self::connect) share its local storage but never close it.
pub trait ReplicaConnector: Send + Sync + 'static {
    /// Connection handle handed to the host.
    type Handle: Send + 'static;

    /// Pull the latest remote state into the local copy.
    fn sync(&self) -> BoxFuture<'_, ()>;

    /// Open a fresh handle bound to this connector's storage.
    fn connect(&self) -> DriverResult<Self::Handle>;

    /// Stop background sync and release the local storage.
    ///
    /// Consumes the connector, so it can be closed at most once.
    fn close(self) -> BoxFuture<'static, ()>;
}

/// Trait defining what we need from the storage engine and remote client.
///
/// The host binary provides [`LibsqlDriver`](crate::LibsqlDriver); tests use
/// recording mocks.
pub trait DatabaseDriver: Send + Sync + 'static {
    /// Connection handle handed to the host.
    type Handle: Send + 'static;

    /// Replica connector type, yielding the same handle type.
    type Replica: ReplicaConnector<Handle = Self::Handle>;

    /// Open a purely local database file.
    fn open_local<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Self::Handle>;

    /// Open a direct network connection to a remote endpoint.
    fn open_remote<'a>(&'a self, endpoint: &'a RemoteEndpoint) -> BoxFuture<'a, Self::Handle>;

    /// Construct (but do not sync) an embedded replica connector.
    fn open_replica(&self, options: ReplicaOptions) -> BoxFuture<'_, Self::Replica>;
}
