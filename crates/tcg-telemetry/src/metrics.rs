//! Prometheus metrics for this node's subsystems.
//!
//! Metric names follow `tcg_<subsystem>_<metric>_<unit>`.

use lazy_static::lazy_static;
use prometheus::{exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    /// Total blocks appended to the local ledger, local or remote-adopted.
    pub static ref BLOCKS_APPENDED: Counter = Counter::new(
        "tcg_ledger_blocks_appended_total",
        "Total number of blocks appended to the ledger"
    ).expect("metric creation failed");

    /// Current chain height.
    pub static ref CHAIN_HEIGHT: Gauge = Gauge::new(
        "tcg_ledger_chain_height",
        "Current blockchain height"
    ).expect("metric creation failed");

    /// Proof-of-Work search duration per mined block.
    pub static ref MINING_DURATION: Histogram = Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "tcg_miner_search_duration_seconds",
            "Time spent searching for a valid nonce"
        ).buckets(exponential_buckets(0.01, 2.0, 15).unwrap())
    ).expect("metric creation failed");

    /// Mining rounds cancelled by an incoming remote block.
    pub static ref MINING_CANCELLATIONS: Counter = Counter::new(
        "tcg_dispatcher_mining_cancellations_total",
        "Total number of in-flight mining rounds cancelled by a remote block"
    ).expect("metric creation failed");

    /// Current mempool size (transaction count).
    pub static ref MEMPOOL_SIZE: Gauge = Gauge::new(
        "tcg_mempool_transactions_pending",
        "Number of pending transactions in the mempool"
    ).expect("metric creation failed");

    /// Total transactions admitted to the mempool.
    pub static ref TRANSACTIONS_RECEIVED: Counter = Counter::new(
        "tcg_mempool_transactions_received_total",
        "Total transactions admitted to the mempool"
    ).expect("metric creation failed");

    /// Signature verification outcomes.
    pub static ref SIGNATURE_VERIFICATIONS: CounterVec = CounterVec::new(
        prometheus::Opts::new("tcg_signature_verifications_total", "Total signature verifications"),
        &["result"]
    ).expect("metric creation failed");

    /// Live cluster peers as of the most recent health probe.
    pub static ref PEERS_ALIVE: Gauge = Gauge::new(
        "tcg_cluster_peers_alive",
        "Number of peers considered alive as of the most recent health probe"
    ).expect("metric creation failed");

    /// Leader election changes observed.
    pub static ref LEADER_CHANGES: Counter = Counter::new(
        "tcg_cluster_leader_changes_total",
        "Total number of leader elections that changed the leader"
    ).expect("metric creation failed");

    /// Matches finished, by outcome.
    pub static ref MATCHES_FINISHED: CounterVec = CounterVec::new(
        prometheus::Opts::new("tcg_match_finished_total", "Total matches finished"),
        &["outcome"]  // victory / forfeit / timeout
    ).expect("metric creation failed");

    /// Trades finished, by outcome.
    pub static ref TRADES_FINISHED: CounterVec = CounterVec::new(
        prometheus::Opts::new("tcg_trade_finished_total", "Total trades finished"),
        &["outcome"]  // completed / abandoned
    ).expect("metric creation failed");
}

/// Handle for the registered metrics. Keeps the registry alive.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register every metric above with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(BLOCKS_APPENDED.clone()),
        Box::new(CHAIN_HEIGHT.clone()),
        Box::new(MINING_DURATION.clone()),
        Box::new(MINING_CANCELLATIONS.clone()),
        Box::new(MEMPOOL_SIZE.clone()),
        Box::new(TRANSACTIONS_RECEIVED.clone()),
        Box::new(SIGNATURE_VERIFICATIONS.clone()),
        Box::new(PEERS_ALIVE.clone()),
        Box::new(LEADER_CHANGES.clone()),
        Box::new(MATCHES_FINISHED.clone()),
        Box::new(TRADES_FINISHED.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode every registered metric as Prometheus text format, for `GET /metrics`.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard that observes elapsed time into a histogram on drop.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}
