//! Tracing subscriber setup for services embedding the client

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`
///
/// `default_directive` (e.g. `"info"` or `"case_data_client=debug"`) applies
/// when `RUST_LOG` is unset or invalid. Returns `false` if a global subscriber
/// was already installed, in which case nothing changes.
pub fn init(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
