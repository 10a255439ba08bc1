// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Platform capability for embedded replicas.
//!
//! Embedded replica connectors only exist on some (OS, architecture)
//! combinations. Everywhere else a configured remote is reached directly.
//! The table lives here and is consulted once at startup; the resolver only
//! ever sees the resulting [`ReplicationSupport`] value.
//!
//! ```text
//! OS        Arch      Embedded replica
//! -------   -------   ----------------
//! windows   any       no  (remote-only fallback)
//! macos     x86_64    no  (remote-only fallback)
//! other     any       yes
//! ```

use std::fmt;

/// Whether background replica connectors can be created on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicationSupport {
    /// Embedded replicas are available.
    Supported,
    /// Only local files and direct remote connections are available.
    Unsupported,
}

impl ReplicationSupport {
    /// Capability of the running binary's target.
    pub fn detect() -> Self {
        Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Capability of an arbitrary `(os, arch)` pair, using the names from
    /// [`std::env::consts`].
    pub fn for_target(os: &str, arch: &str) -> Self {
        match (os, arch) {
            ("windows", _) => Self::Unsupported,
            ("macos", "x86_64") => Self::Unsupported,
            _ => Self::Supported,
        }
    }

    pub fn is_supported(self) -> bool {
        self == Self::Supported
    }
}

impl fmt::Display for ReplicationSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Supported => write!(f, "supported"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}
