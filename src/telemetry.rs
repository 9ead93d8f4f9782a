//! Tracing setup for binaries and tests embedding sheetql

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `RUST_LOG`
///
/// `default_filter` applies when `RUST_LOG` is unset or invalid. Safe to call
/// more than once: only the first call installs a subscriber.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
}
