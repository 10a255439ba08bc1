//! Fuzz target for sync interval parsing.
//!
//! `parse_sync_interval` must never panic and never accept a sub-second
//! interval.

#![no_main]

use libfuzzer_sys::fuzz_target;
use replica_connector::config::parse_sync_interval;

fuzz_target!(|raw: &str| {
    if let Ok(interval) = parse_sync_interval(raw) {
        assert!(interval.as_secs() >= 1);
    }
});
