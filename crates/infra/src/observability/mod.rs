//! Logging setup
//!
//! Installs the process-wide `tracing` subscriber. Library code only emits
//! events; binaries and examples call [`init_tracing`] once at startup.
//!
//! The filter comes from `RUST_LOG` when it is set and from
//! [`LoggingConfig::filter`] otherwise.

use fmdata_domain::{FmDataError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// # Errors
/// Returns `FmDataError::Config` if the filter directive is invalid or a
/// global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(config.json.then(|| fmt::layer().json()))
        .with((!config.json).then(|| fmt::layer()))
        .try_init()
        .map_err(|e| FmDataError::Config(format!("failed to install tracing subscriber: {e}")))?;

    tracing::debug!(filter = %config.filter, json = config.json, "tracing initialised");
    Ok(())
}

/// Filter used by [`init_tracing`].
///
/// # Errors
/// Returns `FmDataError::Config` if neither `RUST_LOG` nor the configured
/// directive parses.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.filter).map_err(|e| {
            FmDataError::Config(format!("invalid log filter {:?}: {e}", config.filter))
        })
    })
}
