//! Subscriber setup shared by the `leafscan` and `studio` binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result};

/// Installs a `fmt` subscriber. `RUST_LOG` wins when set; otherwise the
/// level is `debug` with `verbose` and `info` without.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact())
        .with(filter)
        .try_init()
        .map_err(|e| Error::Configuration(format!("Failed to initialize logger: {e}")))?;

    Ok(())
}
