//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Initialize tracing with an env-filter (`RUST_LOG`), defaulting to
/// `info` for this crate and `warn` for everything else. Safe to call
/// more than once; later calls keep the first subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,football_scrape=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
