//! Nakamoto synchronization: periodically polls every peer's `GET
//! /blockchain/` and adopts their chain if it is both longer and valid.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::dto::BlockchainResponse;
use crate::state::Node;

const SYNC_INTERVAL: Duration = Duration::from_secs(10);
const PEER_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn run_sync_loop(node: Arc<Node>) {
    loop {
        sync_once(&node).await;
        tokio::time::sleep(SYNC_INTERVAL).await;
    }
}

async fn sync_once(node: &Node) {
    for (peer_id, host) in &node.config.server_list {
        if peer_id == &node.config.server_id {
            continue;
        }
        if !node.cluster.is_alive(peer_id).await {
            continue;
        }

        let url = format!("http://{host}/blockchain/");
        let response = match node.http.get(&url).timeout(PEER_TIMEOUT).send().await {
            Ok(resp) => resp,
            Err(err) => {
                warn!(peer = %peer_id, error = %err, "nakamoto sync probe failed");
                continue;
            }
        };

        let snapshot = match response.json::<BlockchainResponse>().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(peer = %peer_id, error = %err, "peer returned an unparsable blockchain snapshot");
                continue;
            }
        };

        let local_height = node.ledger.lock().await.height();
        if snapshot.height <= local_height {
            continue;
        }

        let adopted = node
            .ledger
            .lock()
            .await
            .adopt_if_better(snapshot.ledger, peer_id, &node.config.server_id);
        if adopted {
            tracing::info!(peer = %peer_id, height = snapshot.height, "adopted peer's longer valid chain");
        }
    }
}
