//! Logging setup
//!
//! The runtime emits `tracing` events; hosts that do not install their own
//! subscriber can call [`init`] to get formatted output on stderr.
//! Filtering follows `EnvFilter` syntax read from `ARRAYSCRIPT_LOG`, e.g.
//! `ARRAYSCRIPT_LOG=arrayscript_runtime=trace`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "ARRAYSCRIPT_LOG";

const DEFAULT_DIRECTIVE: &str = "arrayscript_runtime=info";

/// Install the global stderr subscriber
///
/// Returns false if a global subscriber was already installed; calling
/// this more than once is harmless.
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
