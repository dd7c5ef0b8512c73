//! Diagnostic logging setup for the command-line binary.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber.
///
/// Defaults to `warn` so diagnostics stay out of the way of regular output; `RUST_LOG`
/// overrides the filter.
pub fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialise logging: {err}"))?;

    tracing::debug!("logging initialised");
    Ok(())
}
