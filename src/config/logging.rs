//! Logging initialization for host applications.
//!
//! The crate itself only emits `tracing` events; a host embedding it calls
//! [`init`] once, as early as possible, to install a subscriber. Filtering
//! follows `RUST_LOG` and defaults to `info`.

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. Safe to call once per process.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Best-effort variant for tests, where a subscriber may already be
/// installed by another test in the same process.
pub fn try_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}
