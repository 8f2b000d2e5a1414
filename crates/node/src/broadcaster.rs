//! Outbound block broadcast: POSTs a mined or adopted block to every other
//! known peer's `/blockchain/block`. Best-effort, per the
//! `BlockBroadcaster` contract — a peer that misses a block catches up
//! later via Nakamoto synchronization.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tcg_dispatcher::BlockBroadcaster;
use tcg_types::Block;
use tracing::warn;

/// Peer HTTP timeout for block propagation.
const BROADCAST_TIMEOUT: Duration = Duration::from_secs(2);

pub struct NodeBroadcaster {
    local_id: String,
    server_list: HashMap<String, String>,
    http: reqwest::Client,
}

impl NodeBroadcaster {
    pub fn new(local_id: String, server_list: HashMap<String, String>) -> Self {
        Self {
            local_id,
            server_list,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl BlockBroadcaster for NodeBroadcaster {
    async fn broadcast(&self, block: Block) {
        let peers: Vec<(&String, &String)> = self
            .server_list
            .iter()
            .filter(|(id, _)| **id != self.local_id)
            .collect();

        let sends = peers.into_iter().map(|(id, host)| {
            let http = self.http.clone();
            let block = &block;
            let url = format!("http://{host}/blockchain/block");
            async move {
                if let Err(err) = http.post(&url).timeout(BROADCAST_TIMEOUT).json(block).send().await {
                    warn!(peer = %id, error = %err, "failed to broadcast block to peer");
                }
            }
        });

        futures::future::join_all(sends).await;
    }
}
