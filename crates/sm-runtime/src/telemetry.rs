//! Tracing initialization for embedding binaries and integration tests.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// The filter honors `RUST_LOG`, defaulting to `info`. Call once per
/// process; a second call fails because the global subscriber is already
/// set.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install global tracing subscriber")
}
