//! Logging initialisation.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Environment variable consulted for the filter directive.
pub const LOG_ENV_VAR: &str = "RATIOKIT_LOG";

/// Build the filter: `RATIOKIT_LOG` if set and valid, otherwise the
/// configured default, otherwise `info`.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&config.default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global `tracing` subscriber.
///
/// Returns `false` when a global subscriber was already installed, so hosts
/// and tests can call this unconditionally.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = build_filter(config);
    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(json = config.json, "Logging initialised");
    }
    installed
}
