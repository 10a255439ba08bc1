//! Resolution types and the pure selection policy.
//!
//! # Decision Order
//!
//! ```text
//! identifier contains "auxiliary.db" ──yes──→ Local
//!            │ no
//! remote URL empty ─────────────────yes──→ Local
//!            │ no
//! replicas supported on platform ────no──→ Remote (direct, token in URL)
//!            │ yes
//!            ↓
//!      EmbeddedReplica
//! ```
//!
//! The first matching rule wins, so the auxiliary override beats any
//! configured remote.

use crate::config::ConnectionConfig;
use crate::platform::ReplicationSupport;
use std::fmt;

/// Marker that classifies a path as the auxiliary database.
pub const AUXILIARY_MARKER: &str = "auxiliary.db";

/// Which database a logical identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseRole {
    /// Main application data.
    Primary,
    /// Auxiliary data (logs etc.). Never replicated.
    Auxiliary,
}

impl DatabaseRole {
    /// Classify by substring match on [`AUXILIARY_MARKER`]. No other naming
    /// scheme is recognized.
    pub fn classify(identifier: &str) -> Self {
        if identifier.contains(AUXILIARY_MARKER) {
            Self::Auxiliary
        } else {
            Self::Primary
        }
    }
}

impl fmt::Display for DatabaseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseRole::Primary => write!(f, "primary"),
            DatabaseRole::Auxiliary => write!(f, "auxiliary"),
        }
    }
}

/// How a database ends up being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionMode {
    /// Local file only.
    Local,
    /// Direct network connection to the remote endpoint.
    Remote,
    /// Local file kept in sync with the remote by a background connector.
    EmbeddedReplica,
}

impl ConnectionMode {
    /// Metric/log label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionMode::Local => "local",
            ConnectionMode::Remote => "remote",
            ConnectionMode::EmbeddedReplica => "embedded_replica",
        }
    }
}

impl fmt::Display for ConnectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide how `role` is served under `config` on a host with `support`.
pub fn select_mode(
    role: DatabaseRole,
    config: &ConnectionConfig,
    support: ReplicationSupport,
) -> ConnectionMode {
    if role == DatabaseRole::Auxiliary {
        return ConnectionMode::Local;
    }
    if !config.is_remote() {
        return ConnectionMode::Local;
    }
    if !support.is_supported() {
        return ConnectionMode::Remote;
    }
    ConnectionMode::EmbeddedReplica
}
