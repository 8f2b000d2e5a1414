//! # tcg-telemetry
//!
//! Structured logging and Prometheus metrics shared by every node process.
//!
//! ## Environment variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TCG_SERVICE_NAME` | `tcg-node` | Service name attached to every log line |
//! | `TCG_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `TCG_JSON_LOGS` | `false` | Emit JSON logs instead of human-readable text |

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{init_logging, LoggingGuard};
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, MetricsHandle, BLOCKS_APPENDED, CHAIN_HEIGHT,
    LEADER_CHANGES, MATCHES_FINISHED, MEMPOOL_SIZE, MINING_CANCELLATIONS, MINING_DURATION, PEERS_ALIVE,
    SIGNATURE_VERIFICATIONS, TRADES_FINISHED, TRANSACTIONS_RECEIVED,
};

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("failed to initialize logging subscriber: {0}")]
    LoggerInit(String),

    #[error("failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("invalid telemetry configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics for this process. Call once, as early as
/// possible in `main`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(LoggingGuard, MetricsHandle), TelemetryError> {
    let metrics_handle = register_metrics()?;
    let logging_guard = init_logging(config)?;
    Ok((logging_guard, metrics_handle))
}
