//! Fuzz target for environment-driven settings and mode selection.
//!
//! Arbitrary variable values must never panic, and the auxiliary path must
//! resolve local whatever they contain.

#![no_main]

use libfuzzer_sys::fuzz_target;
use replica_connector::resolver::select_mode;
use replica_connector::{ConnectionMode, ConnectorSettings, DatabaseRole, ReplicationSupport};

fuzz_target!(|data: (&str, &str, &str, &str)| {
    let (url, aux_url, token, interval) = data;
    let settings = ConnectorSettings::from_lookup(|key| match key {
        "LIBSQL_DATABASE_URL" => Some(url.to_string()),
        "LIBSQL_AUX_DATABASE_URL" => Some(aux_url.to_string()),
        "LIBSQL_AUTH_TOKEN" => Some(token.to_string()),
        "LIBSQL_SYNC_INTERVAL" => Some(interval.to_string()),
        _ => None,
    });
    assert!(settings.primary.sync_interval_sec >= 1);

    for support in [ReplicationSupport::Supported, ReplicationSupport::Unsupported] {
        let role = DatabaseRole::classify("pb_data/auxiliary.db");
        let mode = select_mode(role, settings.for_role(role), support);
        assert_eq!(mode, ConnectionMode::Local);
    }
});
