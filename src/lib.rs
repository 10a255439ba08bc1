//! # Replica Connector
//!
//! Connection strategy selection for libSQL-backed application servers.
//!
//! ## Architecture
//!
//! The host framework asks for a connection per logical database path. The
//! resolver picks one of three modes and owns every embedded replica it
//! creates until the host's termination hook drains them:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │                           replica-connector                            │
//! │                                                                        │
//! │  ┌───────────────────┐    ┌────────────────────┐    ┌───────────────┐  │
//! │  │ ConnectionFactory │───►│ ConnectionResolver │───►│ DatabaseDriver│  │
//! │  │ (path → role cfg) │    │ (policy + lock)    │    │ (libSQL)      │  │
//! │  └───────────────────┘    └────────────────────┘    └───────────────┘  │
//! │          │                         │                                   │
//! │          ▼                         ▼                                   │
//! │  ┌───────────────────┐    ┌────────────────────┐                       │
//! │  │ on_terminate()    │───►│ Registry           │                       │
//! │  │ (shutdown drain)  │    │ (replicas, latch)  │                       │
//! │  └───────────────────┘    └────────────────────┘                       │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Connection Modes
//!
//! 1. **Local**: auxiliary database, or no remote URL configured
//! 2. **Remote**: remote URL set but this platform has no embedded replicas
//! 3. **Embedded replica**: local file synced from the remote in the background
//!
//! ## Usage
//!
//! ```rust,no_run
//! # #[cfg(feature = "libsql")]
//! # async fn example() -> replica_connector::Result<()> {
//! use replica_connector::{ConnectionFactory, ConnectorSettings, LibsqlDriver, ReplicationSupport};
//!
//! let factory = ConnectionFactory::new(
//!     LibsqlDriver::new(),
//!     ConnectorSettings::from_env(),
//!     ReplicationSupport::detect(),
//! );
//!
//! let main_db = factory.connect("pb_data/data.db").await?;
//! let aux_db = factory.connect("pb_data/auxiliary.db").await?;
//!
//! // ... serve ...
//!
//! factory.on_terminate().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod factory;
#[cfg(feature = "libsql")]
pub mod libsql_driver;
pub mod metrics;
pub mod platform;
mod registry;
pub mod resolver;

// Re-exports for convenience
pub use config::{ConnectionConfig, ConnectorSettings};
pub use driver::{DatabaseDriver, DriverError, RemoteEndpoint, ReplicaConnector, ReplicaOptions};
pub use error::{ConnectError, Result};
pub use factory::ConnectionFactory;
#[cfg(feature = "libsql")]
pub use libsql_driver::{LibsqlDriver, LibsqlHandle, LibsqlReplica};
pub use platform::ReplicationSupport;
pub use resolver::{ConnectionMode, ConnectionResolver, DatabaseRole, ShutdownSummary};
