//! Tracing initialization utilities.

use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

/// Initialize tracing with the given default filter.
///
/// The filter can be overridden by the `RUST_LOG` environment variable.
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```rust
/// use recent_tokens::init_tracing;
///
/// // Debug for this crate (one line per tick), info for everything else
/// init_tracing("recent_tokens=debug,info").unwrap();
/// ```
///
/// # Filter Syntax
///
/// The filter follows the `tracing_subscriber::EnvFilter` syntax:
/// - `info` - Enable info level for all targets
/// - `recent_tokens=debug` - Enable debug level for this crate
/// - `recent_tokens::producer=trace` - Trace level for a specific module
/// - `tower_http=debug` - Per-request spans from the HTTP layer
pub fn init_tracing(default_filter: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
}
