//! Logging and tracing utilities

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing subscriber with default configuration
///
/// Reads the filter from `RUST_LOG`, falling back to `info`.
/// Panics if a global subscriber is already installed; use
/// [`try_init_tracing`] where that can happen (tests, embedding hosts).
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize tracing, returning an error instead of panicking when a
/// subscriber has already been set.
pub fn try_init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init()?;
    Ok(())
}
