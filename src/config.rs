//! Configuration for connector selection.
//!
//! Each database role (primary, auxiliary) gets its own immutable
//! [`ConnectionConfig`]. Configuration is read once at process start, usually
//! via [`ConnectorSettings::from_env()`], and never mutated afterwards.
//!
//! # Quick Start
//!
//! ```rust
//! use replica_connector::config::{ConnectionConfig, ConnectorSettings};
//!
//! let settings = ConnectorSettings {
//!     primary: ConnectionConfig::remote("libsql://example.turso.io", Some("tok123".into())),
//!     ..Default::default()
//! };
//! assert!(settings.primary.is_remote());
//! assert!(!settings.auxiliary.is_remote());
//! ```
//!
//! # Environment
//!
//! ```text
//! LIBSQL_DATABASE_URL      primary remote URL (fallback: TURSO_DATABASE_URL)
//! LIBSQL_AUTH_TOKEN        primary token      (fallback: TURSO_AUTH_TOKEN)
//! LIBSQL_AUX_DATABASE_URL  auxiliary remote URL
//! LIBSQL_AUX_AUTH_TOKEN    auxiliary token
//! LIBSQL_SYNC_INTERVAL     seconds between background syncs (default 60)
//! ```

use crate::error::{ConnectError, Result};
use crate::resolver::DatabaseRole;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::warn;

pub const ENV_DATABASE_URL: &str = "LIBSQL_DATABASE_URL";
pub const ENV_AUTH_TOKEN: &str = "LIBSQL_AUTH_TOKEN";
pub const ENV_TURSO_DATABASE_URL: &str = "TURSO_DATABASE_URL";
pub const ENV_TURSO_AUTH_TOKEN: &str = "TURSO_AUTH_TOKEN";
pub const ENV_AUX_DATABASE_URL: &str = "LIBSQL_AUX_DATABASE_URL";
pub const ENV_AUX_AUTH_TOKEN: &str = "LIBSQL_AUX_AUTH_TOKEN";
pub const ENV_SYNC_INTERVAL: &str = "LIBSQL_SYNC_INTERVAL";

/// Default period between background syncs.
pub const DEFAULT_SYNC_INTERVAL_SEC: u64 = 60;

/// Shortest background sync period handed to a replica connector.
pub const MIN_SYNC_INTERVAL_SEC: u64 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// ConnectionConfig: one per database role
// ═══════════════════════════════════════════════════════════════════════════════

/// Remote endpoint, token and sync cadence for one database role.
///
/// An empty `url` means local-only.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Remote endpoint URL; empty for local-only.
    #[serde(default)]
    pub url: String,

    /// Bearer token for the remote endpoint.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Seconds between background syncs (replica mode only).
    #[serde(default = "default_sync_interval_sec")]
    pub sync_interval_sec: u64,
}

fn default_sync_interval_sec() -> u64 {
    DEFAULT_SYNC_INTERVAL_SEC
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::local_only()
    }
}

impl ConnectionConfig {
    /// Config with no remote endpoint.
    pub fn local_only() -> Self {
        Self {
            url: String::new(),
            auth_token: None,
            sync_interval_sec: DEFAULT_SYNC_INTERVAL_SEC,
        }
    }

    /// Config pointing at a remote endpoint with the default sync interval.
    pub fn remote(url: impl Into<String>, auth_token: Option<String>) -> Self {
        Self {
            url: url.into(),
            auth_token,
            sync_interval_sec: DEFAULT_SYNC_INTERVAL_SEC,
        }
    }

    /// Builder-style override of the sync interval.
    ///
    /// Sub-second remainders round up to the next whole second.
    pub fn with_sync_interval(mut self, interval: Duration) -> Self {
        let secs = interval.as_secs() + u64::from(interval.subsec_nanos() > 0);
        self.sync_interval_sec = secs.max(MIN_SYNC_INTERVAL_SEC);
        self
    }

    /// Whether a remote endpoint is configured.
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty()
    }

    /// Get the sync interval as a Duration, never below
    /// [`MIN_SYNC_INTERVAL_SEC`]. A zero period would make the connector's
    /// background sync loop without pause.
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_sec.max(MIN_SYNC_INTERVAL_SEC))
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("sync_interval_sec", &self.sync_interval_sec)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ConnectorSettings: per-role bundle read from the environment
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-role connection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectorSettings {
    /// Main application database.
    #[serde(default)]
    pub primary: ConnectionConfig,

    /// Auxiliary database (logs and similar). Carried for completeness; the
    /// resolver always opens it locally.
    #[serde(default)]
    pub auxiliary: ConnectionConfig,
}

impl ConnectorSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// Empty values count as unset. `LIBSQL_*` names win over their `TURSO_*`
    /// fallbacks. A malformed sync interval falls back to the default with a
    /// warning rather than failing startup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let sync_interval_sec = match get(ENV_SYNC_INTERVAL) {
            Some(raw) => parse_sync_interval(&raw).map(|d| d.as_secs()).unwrap_or_else(|e| {
                warn!(
                    value = %raw,
                    default_sec = DEFAULT_SYNC_INTERVAL_SEC,
                    error = %e,
                    "Invalid sync interval, using default"
                );
                DEFAULT_SYNC_INTERVAL_SEC
            }),
            None => DEFAULT_SYNC_INTERVAL_SEC,
        };

        let primary = ConnectionConfig {
            url: get(ENV_DATABASE_URL)
                .or_else(|| get(ENV_TURSO_DATABASE_URL))
                .unwrap_or_default(),
            auth_token: get(ENV_AUTH_TOKEN).or_else(|| get(ENV_TURSO_AUTH_TOKEN)),
            sync_interval_sec,
        };

        let auxiliary = ConnectionConfig {
            url: get(ENV_AUX_DATABASE_URL).unwrap_or_default(),
            auth_token: get(ENV_AUX_AUTH_TOKEN),
            sync_interval_sec,
        };

        Self { primary, auxiliary }
    }

    /// Configuration for a given role.
    pub fn for_role(&self, role: DatabaseRole) -> &ConnectionConfig {
        match role {
            DatabaseRole::Primary => &self.primary,
            DatabaseRole::Auxiliary => &self.auxiliary,
        }
    }
}

/// Parse a sync interval: whole seconds (`"60"`) or a humantime duration
/// (`"90s"`, `"2m"`). Zero is rejected since the connector needs a period.
pub fn parse_sync_interval(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let interval = match raw.parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => humantime::parse_duration(raw)
            .map_err(|e| ConnectError::Config(format!("{}: {}", ENV_SYNC_INTERVAL, e)))?,
    };

    if interval.as_secs() == 0 {
        return Err(ConnectError::Config(format!(
            "{} must be at least one second",
            ENV_SYNC_INTERVAL
        )));
    }
    Ok(interval)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
