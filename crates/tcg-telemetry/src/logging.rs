//! Global `tracing` subscriber installation.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{TelemetryConfig, TelemetryError};

/// Guard returned by [`init_logging`]; holding it keeps the subscriber alive.
/// Dropping it has no special effect beyond the default subscriber teardown.
pub struct LoggingGuard {
    _private: (),
}

/// Install the global `tracing` subscriber for this process. Must be called
/// exactly once, as early as possible in `main`.
pub fn init_logging(config: &TelemetryConfig) -> Result<LoggingGuard, TelemetryError> {
    let env_filter = EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
            .map_err(|e| TelemetryError::LoggerInit(e.to_string()))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
            .map_err(|e| TelemetryError::LoggerInit(e.to_string()))?;
    }

    tracing::info!(service = %config.service_name, json_logs = config.json_logs, "logging initialized");
    Ok(LoggingGuard { _private: () })
}
