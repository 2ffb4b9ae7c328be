//! Logging bootstrap for binaries built on Gridwire.

use tracing_subscriber::EnvFilter;

use crate::GridwireError;

/// Installs a `tracing` subscriber that writes to stderr.
///
/// The filter comes from `RUST_LOG` when set, and defaults to `info`
/// otherwise. Libraries never call this; binaries call it once, first
/// thing in `main`.
pub fn init_logging() -> Result<(), GridwireError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| GridwireError::Logging(e.to_string()))?;
    tracing::debug!("logging initialized");
    Ok(())
}
