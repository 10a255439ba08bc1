//! Fuzz target for remote connection strings.
//!
//! The token is appended at most once and the URL prefix is preserved.

#![no_main]

use libfuzzer_sys::fuzz_target;
use replica_connector::RemoteEndpoint;

fuzz_target!(|data: (&str, Option<&str>)| {
    let (url, token) = data;
    let endpoint = RemoteEndpoint::new(url, token.map(str::to_string));
    let dsn = endpoint.connection_string();

    assert!(dsn.starts_with(url));
    match token {
        Some(t) if !t.is_empty() => {
            let suffix = &dsn[url.len()..];
            assert!(suffix.starts_with("?authToken=") || suffix.starts_with("&authToken="));
            assert!(suffix.ends_with(t));
        }
        _ => assert_eq!(dsn, url),
    }
});
