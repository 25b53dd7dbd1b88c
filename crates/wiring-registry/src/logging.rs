use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LogConfig;
use crate::error::{Error, Result};

/// Initialize a tracing subscriber with default configuration.
///
/// Uses the `RUST_LOG` environment variable to determine the log level,
/// defaulting to "info" if not set.
pub fn init() -> Result<()> {
    init_with(&LogConfig::default())
}

/// Initialize a tracing subscriber from a [`LogConfig`].
///
/// `RUST_LOG` still takes precedence over the configured filter. Fails if a
/// global subscriber is already installed.
pub fn init_with(config: &LogConfig) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(config.thread_ids)
        .with_level(true)
        .compact();

    let filter_layer = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&config.filter)?,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| Error::Logging(e.to_string()))
}
