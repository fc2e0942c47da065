//! Runtime configuration
//!
//! Read once per process from environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ARRAYSCRIPT_MAX_DEPTH` | `300` | Maximum callback nesting depth |
//! | `ARRAYSCRIPT_SANDBOX` | `0` | `1`/`true` sandboxes frames created by `call_method_default` |
//!
//! ## Example
//!
//! ```bash
//! # Run every top-level sequence method call sandboxed
//! ARRAYSCRIPT_SANDBOX=1 ./my-host
//! ```

use std::sync::OnceLock;
use tracing::warn;

pub const MAX_DEPTH_ENV: &str = "ARRAYSCRIPT_MAX_DEPTH";
pub const SANDBOX_ENV: &str = "ARRAYSCRIPT_SANDBOX";

/// Default callback nesting limit
pub const DEFAULT_MAX_DEPTH: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Callbacks nested deeper than this fail with `RecursionLimit`
    pub max_depth: usize,
    /// Sandbox flag for frames created without an explicit caller
    pub sandboxed: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            sandboxed: false,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables
    ///
    /// Unparseable values are reported and replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_depth = match std::env::var(MAX_DEPTH_ENV) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => depth,
                _ => {
                    warn!(
                        variable = MAX_DEPTH_ENV,
                        value = %raw,
                        "not a positive integer, using default {}",
                        defaults.max_depth
                    );
                    defaults.max_depth
                }
            },
            Err(_) => defaults.max_depth,
        };

        let sandboxed = match std::env::var(SANDBOX_ENV) {
            Ok(raw) => match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "" | "0" | "false" | "no" => false,
                _ => {
                    warn!(variable = SANDBOX_ENV, value = %raw, "not recognized, ignoring");
                    defaults.sandboxed
                }
            },
            Err(_) => defaults.sandboxed,
        };

        Self {
            max_depth,
            sandboxed,
        }
    }
}

static RUNTIME_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

/// Process-wide configuration, loaded from the environment on first use
pub fn runtime_config() -> &'static RuntimeConfig {
    RUNTIME_CONFIG.get_or_init(RuntimeConfig::from_env)
}
