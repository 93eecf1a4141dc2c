//! Diagnostic tracing for resell sessions.
//!
//! Reads `RUST_LOG`; defaults to `info` so the per-cell protocol is visible
//! during unattended runs. Output goes to stderr, leaving stdout for the
//! session report.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// # Example
/// ```bash
/// RUST_LOG=resell=debug resell replay --script session.toml
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
