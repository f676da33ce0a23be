//! Logging
//!
//! Installs the global `tracing` subscriber. Logs go to stderr so stdout stays
//! free for JSON-lines output.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, RuntimeConfig};
use crate::error::{AppError, AppResult};

/// Installs the subscriber described by `config`.
///
/// Returns `Ok(false)` when a global subscriber was already installed, so calling
/// it more than once is harmless.
pub fn init(config: &RuntimeConfig) -> AppResult<bool> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| AppError::config(format!("invalid log filter '{}': {}", config.log_filter, e)))?;

    let installed = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };

    Ok(installed)
}
