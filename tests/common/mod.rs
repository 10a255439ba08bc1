//! Shared test utilities for the integration tests.
//!
//! This module provides:
//! - Mock DatabaseDriver recording opens, builds, syncs and closes
//! - In-memory tracing capture for log assertions
//! - Config helpers for the common scenarios

#![allow(dead_code)]

pub mod log_capture;
pub mod mock_driver;

pub use log_capture::*;
pub use mock_driver::*;

use replica_connector::ConnectionConfig;

pub const PRIMARY_PATH: &str = "pb_data/data.db";
pub const AUX_PATH: &str = "pb_data/auxiliary.db";
pub const REMOTE_URL: &str = "libsql://example.turso.io";
pub const TOKEN: &str = "tok123";

/// Remote config pointing at [`REMOTE_URL`] with [`TOKEN`].
pub fn remote_config() -> ConnectionConfig {
    ConnectionConfig::remote(REMOTE_URL, Some(TOKEN.to_string()))
}
