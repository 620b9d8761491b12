//! Tracing setup for wodtime.
//!
//! Diagnostics (missing exercises, per-step transition breakdowns, library
//! loads and saves) go to stderr so the duration tables printed by the CLI
//! are the only thing on stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log at `info` unless RUST_LOG says otherwise
pub fn init() {
    init_with_level("info")
}

/// Log to stderr at `default_level`
///
/// The CLI passes `warn`, or `debug` with `--verbose` to see every
/// transition step. RUST_LOG still takes precedence when set.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Debug-level logs captured by the test harness
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
