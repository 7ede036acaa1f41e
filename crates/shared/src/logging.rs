//! Tracing setup shared by the binaries

use tracing_subscriber::EnvFilter;

use crate::{Result, RosterError};

/// Install the global subscriber
///
/// `RUST_LOG` wins; otherwise `default_level` is used as the filter.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| RosterError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| RosterError::Logging(e.to_string()))
}
