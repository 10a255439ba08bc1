// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for connector selection.
//!
//! Errors are categorized by which collaborator failed (local engine, remote
//! client, replica connector) and carry the database path or endpoint that
//! was being opened.
//!
//! # Error Categories
//!
//! | Error Type | Fatal to `resolve` | Description |
//! |------------|--------------------|-------------|
//! | `LocalOpen` | Yes | Local database file could not be opened |
//! | `RemoteOpen` | Yes | Direct remote connection failed (no retry) |
//! | `ReplicaBuild` | Yes | Embedded replica could not be constructed (no local fallback) |
//! | `Handle` | Yes | A live connector refused to hand out a connection |
//! | `Close` | No | Connector close failed during shutdown (logged only) |
//! | `Config` | - | Environment value is malformed |
//! | `Shutdown` | Yes | Resolution attempted after shutdown |
//!
//! A failed initial sync is deliberately not an error: the replica is still
//! registered and served, possibly stale, until the next periodic sync.

use crate::driver::DriverError;
use thiserror::Error;

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, ConnectError>;

/// Errors that can occur while resolving or closing database connections.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// Opening the local on-disk database failed.
    ///
    /// Usually fatal to startup: the host cannot serve without its data file.
    #[error("Failed to open local database {path}: {source}")]
    LocalOpen {
        path: String,
        #[source]
        source: DriverError,
    },

    /// Opening a direct connection to the remote endpoint failed.
    ///
    /// Only reachable on platforms without embedded replica support.
    #[error("Failed to connect to remote database {url}: {source}")]
    RemoteOpen {
        url: String,
        #[source]
        source: DriverError,
    },

    /// Constructing the embedded replica connector failed.
    ///
    /// Replication was requested but cannot be set up. We do not fall back to
    /// local-only so the operator notices instead of serving divergent data.
    #[error("Failed to create embedded replica for {path} (remote {url}): {source}")]
    ReplicaBuild {
        path: String,
        url: String,
        #[source]
        source: DriverError,
    },

    /// A registered connector could not produce a connection handle.
    #[error("Failed to open connection from replica for {path}: {source}")]
    Handle {
        path: String,
        #[source]
        source: DriverError,
    },

    /// Closing a replica connector failed during shutdown.
    ///
    /// Never returned from `shutdown_all()`; logged and counted instead.
    #[error("Failed to close replica for {path}: {source}")]
    Close {
        path: String,
        #[source]
        source: DriverError,
    },

    /// Malformed configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The resolver has already been shut down.
    #[error("Shutdown in progress")]
    Shutdown,
}

impl ConnectError {
    /// The database path or endpoint this error refers to, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::LocalOpen { path, .. }
            | Self::ReplicaBuild { path, .. }
            | Self::Handle { path, .. }
            | Self::Close { path, .. } => Some(path),
            Self::RemoteOpen { url, .. } => Some(url),
            Self::Config(_) | Self::Shutdown => None,
        }
    }
}
