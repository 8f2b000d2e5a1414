//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration for a node process.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error), or a full
    /// `tracing-subscriber` directive string.
    pub log_level: String,

    /// Whether to emit logs as JSON (production) or human-readable text (dev).
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "tcg-node".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Build configuration from environment variables.
    ///
    /// - `TCG_LOG_LEVEL` or `RUST_LOG`: log level filter (default: info)
    /// - `TCG_JSON_LOGS`: emit JSON logs when `true`/`1` (default: false)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("TCG_SERVICE_NAME").unwrap_or_else(|_| "tcg-node".to_string()),

            log_level: env::var("TCG_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            json_logs: env::var("TCG_JSON_LOGS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_text_logging_at_info() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }
}
