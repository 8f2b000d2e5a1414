//! Node configuration from environment variables.
//!
//! Follows the workspace's `serde`-free manual-parsing-with-defaults
//! convention (see `tcg_telemetry::TelemetryConfig::from_env`). No on-disk
//! config file format is introduced.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use tcg_ledger::pow::DEFAULT_TARGET_BITS;
use tcg_match::DEFAULT_TURN_TIMEOUT;
use tcg_trade::DEFAULT_TRADE_TIMEOUT;

const DEFAULT_API_PORT: u16 = 9000;

/// Static cluster membership and this node's own identity and tuning knobs.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// This node's id. Must appear as a key in `server_list`.
    pub server_id: String,
    /// Port this node's HTTP server binds to.
    pub api_port: u16,
    /// Every node in the cluster, including this one, keyed by server id.
    pub server_list: HashMap<String, String>,
    /// Proof-of-Work difficulty, in leading zero bits.
    pub target_bits: u32,
    /// Interval between cluster health-check sweeps.
    pub health_check_interval: Duration,
    /// Per-turn deadline for a match, measured on the host only.
    pub turn_timeout: Duration,
    /// Time a trade may sit with only one side offered before abandonment.
    pub trade_timeout: Duration,
}

impl NodeConfig {
    /// Build configuration from environment variables.
    ///
    /// - `SERVER_ID`: this node's id (default: `node-1`)
    /// - `API_PORT`: HTTP bind port (default: 9000)
    /// - `SERVER_LIST`: comma-separated `id=host:port` pairs for every node
    ///   in the cluster, this one included (default: a single-node cluster
    ///   mapping `SERVER_ID` to `127.0.0.1:API_PORT`)
    /// - `TARGET_BITS`: Proof-of-Work difficulty (default: 20)
    /// - `HEALTH_CHECK_INTERVAL_MS`: cluster probe interval (default: 5000)
    /// - `TURN_TIMEOUT_SECS`: match per-turn deadline (default: 15)
    /// - `TRADE_TIMEOUT_SECS`: trade abandonment deadline (default: 30)
    pub fn from_env() -> Self {
        let server_id = env::var("SERVER_ID").unwrap_or_else(|_| "node-1".to_string());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_API_PORT);

        let server_list = match env::var("SERVER_LIST") {
            Ok(raw) => parse_server_list(&raw),
            Err(_) => {
                let mut solo = HashMap::new();
                solo.insert(server_id.clone(), format!("127.0.0.1:{api_port}"));
                solo
            }
        };

        let target_bits = env::var("TARGET_BITS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TARGET_BITS);

        let health_check_interval = env::var("HEALTH_CHECK_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(tcg_cluster::DEFAULT_HEALTH_CHECK_INTERVAL);

        let turn_timeout = env::var("TURN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TURN_TIMEOUT);

        let trade_timeout = env::var("TRADE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TRADE_TIMEOUT);

        Self {
            server_id,
            api_port,
            server_list,
            target_bits,
            health_check_interval,
            turn_timeout,
            trade_timeout,
        }
    }

    /// This node's own `id=host:port` entry, used to decide whether a peer
    /// id read back from an HTTP call is actually self.
    pub fn local_host(&self) -> Option<&str> {
        self.server_list.get(&self.server_id).map(String::as_str)
    }
}

/// `id=host:port,id=host:port,...` — the list carries no separate id field
/// in the source spec's `SERVER_LIST`, so this implementation requires each
/// entry to name its own id explicitly rather than inventing one.
fn parse_server_list(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|entry| entry.split_once('='))
        .map(|(id, host)| (id.trim().to_string(), host.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_server_list_entries() {
        let parsed = parse_server_list("node-a=10.0.0.1:9000,node-b=10.0.0.2:9000");
        assert_eq!(parsed.get("node-a").map(String::as_str), Some("10.0.0.1:9000"));
        assert_eq!(parsed.get("node-b").map(String::as_str), Some("10.0.0.2:9000"));
    }

    #[test]
    fn default_config_is_a_solo_cluster() {
        let config = NodeConfig {
            server_id: "node-1".to_string(),
            api_port: DEFAULT_API_PORT,
            server_list: {
                let mut m = HashMap::new();
                m.insert("node-1".to_string(), "127.0.0.1:9000".to_string());
                m
            },
            target_bits: DEFAULT_TARGET_BITS,
            health_check_interval: tcg_cluster::DEFAULT_HEALTH_CHECK_INTERVAL,
            turn_timeout: DEFAULT_TURN_TIMEOUT,
            trade_timeout: DEFAULT_TRADE_TIMEOUT,
        };
        assert_eq!(config.local_host(), Some("127.0.0.1:9000"));
    }
}
