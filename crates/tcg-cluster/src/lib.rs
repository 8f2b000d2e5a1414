//! # tcg-cluster
//!
//! Health-probe fan-out, live-set tracking, and leader election by
//! lexicographic-minimum alive id — no message exchange beyond the
//! health probes already performed.

mod membership;

pub use membership::Cluster;

use std::time::Duration;

/// `GET /health` timeout, per peer.
pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
/// Default interval between full health-check sweeps.
pub const DEFAULT_HEALTH_CHECK_INTERVAL: Duration = Duration::from_secs(5);
