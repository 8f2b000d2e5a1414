use std::sync::Arc;
use std::time::Duration;

use node::config::NodeConfig;
use node::state::Node;
use node::{router, sync};
use tcg_telemetry::{init_telemetry, TelemetryConfig, LEADER_CHANGES, PEERS_ALIVE};
use tracing::info;

const LEADERSHIP_POLL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = NodeConfig::from_env();
    let (_logging_guard, _metrics_handle) = init_telemetry(&TelemetryConfig::from_env())?;

    info!(server_id = %config.server_id, port = config.api_port, "starting node");

    let node = Node::bootstrap(config);

    tokio::spawn(node.cluster.clone().run_health_check_loop());
    tokio::spawn(node.dispatcher.clone().run_mine_loop());
    tokio::spawn(sync::run_sync_loop(node.clone()));
    tokio::spawn(run_listener_poll_loop(node.clone()));
    tokio::spawn(run_leadership_metrics_loop(node.clone()));

    let addr = format!("0.0.0.0:{}", node.config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "node listening");

    axum::serve(listener, router::build(node))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}

/// Scans newly appended blocks and fans out client confirmations. There is
/// no append-notification channel between the dispatcher and the listener,
/// so this polls `ledger.height()` the same way the dispatcher polls the
/// mempool — simple, and cheap enough at human-scale block rates.
async fn run_listener_poll_loop(node: Arc<Node>) {
    const POLL: Duration = Duration::from_millis(200);
    let mut last_scanned = 0usize;
    loop {
        let blocks_to_scan = {
            let ledger = node.ledger.lock().await;
            if ledger.height() > last_scanned {
                ledger.blocks()[last_scanned..].to_vec()
            } else {
                Vec::new()
            }
        };
        for block in &blocks_to_scan {
            node.listener.scan_block(block).await;
        }
        last_scanned += blocks_to_scan.len();
        tokio::time::sleep(POLL).await;
    }
}

/// Keeps the `tcg_cluster_peers_alive` gauge and the leader-change counter
/// current; `Cluster` itself carries no telemetry dependency.
async fn run_leadership_metrics_loop(node: Arc<Node>) {
    let mut last_leader: Option<String> = None;
    loop {
        PEERS_ALIVE.set(node.cluster.live_ids().await.len() as f64);
        let current = node.cluster.leader().await;
        if current != last_leader && current.is_some() {
            LEADER_CHANGES.inc();
        }
        last_leader = current;
        tokio::time::sleep(LEADERSHIP_POLL).await;
    }
}
