use tracing_subscriber::EnvFilter;

use crate::config::LoggingSection;
use crate::error::SiteError;

/// Installs a global fmt subscriber filtered by `level` (any `EnvFilter`
/// directive, e.g. `info` or `leadpipe=debug,delivery=warn`).
///
/// A second call fails with [`SiteError::Telemetry`] and leaves the first
/// subscriber in place.
pub fn init_tracing(level: &str, json: bool) -> Result<(), SiteError> {
    let filter =
        EnvFilter::try_new(level).map_err(|e| SiteError::Telemetry(format!("filter '{level}': {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| SiteError::Telemetry(e.to_string()))
}

pub fn init_from_config(logging: &LoggingSection) -> Result<(), SiteError> {
    init_tracing(&logging.level, logging.json)
}
