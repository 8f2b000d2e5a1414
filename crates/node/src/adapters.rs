//! Bridges between the domain coordinators (`tcg-match`, `tcg-trade`) and
//! this node's concrete transport: local delivery via the reply bus when
//! a player is connected here, HTTP relay to the peer server otherwise.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde_json::Value;
use tcg_bus::ReplyBus;
use tcg_directory::PlayerDirectory;
use tcg_mempool::Mempool;
use tcg_match::{BattleResultSubmitter, MatchNotifier};
use tcg_telemetry::{MATCHES_FINISHED, TRADES_FINISHED};
use tcg_trade::TradeResultSubmitter;
use tcg_types::{ReplyEnvelope, ReplyKind, TransactionType};
use tokio::sync::Mutex;
use tracing::warn;

use crate::identity::NodeIdentity;

const RELAY_TIMEOUT: Duration = Duration::from_secs(2);

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_secs()
}

/// The relay endpoint a `ReplyKind` rides on when the addressed player is
/// connected to a different server than the one running this coordinator.
/// `BattleStarted` is deliberately absent: the host delivers it as part of
/// the `/battle/initiate` handshake before the coordinator is even spawned,
/// so by the time the coordinator's own `BattleStarted` notify fires for a
/// remote player it has already been delivered and is a no-op here.
fn relay_path(kind: ReplyKind) -> Option<&'static str> {
    match kind {
        ReplyKind::YourTurn => Some("/battle/request_move"),
        ReplyKind::TurnResult => Some("/battle/turn_result"),
        ReplyKind::BattleEnded => Some("/battle/end"),
        _ => None,
    }
}

/// `MatchNotifier` adapter: publishes locally when the player is connected
/// to this server, else relays to the peer server hosting them.
pub struct NodeMatchNotifier {
    local_server_id: String,
    directory: std::sync::Arc<PlayerDirectory>,
    bus: std::sync::Arc<dyn ReplyBus>,
    http: reqwest::Client,
}

impl NodeMatchNotifier {
    pub fn new(
        local_server_id: String,
        directory: std::sync::Arc<PlayerDirectory>,
        bus: std::sync::Arc<dyn ReplyBus>,
    ) -> Self {
        Self { local_server_id, directory, bus, http: reqwest::Client::new() }
    }
}

#[async_trait]
impl MatchNotifier for NodeMatchNotifier {
    async fn notify(&self, player_id: &str, kind: ReplyKind, payload: Value) {
        let Some(entry) = self.directory.get(player_id).await else {
            warn!(player_id, "cannot notify player absent from the directory");
            return;
        };

        if entry.server_id == self.local_server_id {
            self.bus.publish(&entry.reply_channel, ReplyEnvelope::new(kind, payload)).await;
            return;
        }

        if kind == ReplyKind::BattleStarted {
            return;
        }

        let Some(path) = relay_path(kind) else {
            warn!(player_id, ?kind, "no relay path for this notification to a remote player");
            return;
        };

        let url = format!("http://{}{path}", entry.server_host);
        if let Err(err) = self.http.post(&url).timeout(RELAY_TIMEOUT).json(&payload).send().await {
            warn!(player_id, %url, error = %err, "failed to relay match notification to peer server");
        }
    }
}

/// Submits the host-signed `BattleResult` transaction once a match ends.
pub struct NodeBattleResultSubmitter {
    server_id: String,
    identity: std::sync::Arc<NodeIdentity>,
    mempool: std::sync::Arc<Mutex<Mempool>>,
}

impl NodeBattleResultSubmitter {
    pub fn new(
        server_id: String,
        identity: std::sync::Arc<NodeIdentity>,
        mempool: std::sync::Arc<Mutex<Mempool>>,
    ) -> Self {
        Self { server_id, identity, mempool }
    }
}

#[async_trait]
impl BattleResultSubmitter for NodeBattleResultSubmitter {
    async fn submit_battle_result(&self, battle_id: &str, winner_id: &str, metadata: &str) {
        let tx = self.identity.sign_transaction(
            TransactionType::BattleResult,
            vec![
                battle_id.to_string(),
                self.server_id.clone(),
                winner_id.to_string(),
                metadata.to_string(),
            ],
            now_secs(),
        );
        match self.mempool.lock().await.add(tx) {
            Ok(()) => MATCHES_FINISHED.with_label_values(&["completed"]).inc(),
            Err(err) => warn!(battle_id, error = %err, "failed to submit host-signed battle result"),
        }
    }
}

/// Submits the two-party `Trade` transaction once both offers are in.
pub struct NodeTradeResultSubmitter {
    identity: std::sync::Arc<NodeIdentity>,
    mempool: std::sync::Arc<Mutex<Mempool>>,
}

impl NodeTradeResultSubmitter {
    pub fn new(identity: std::sync::Arc<NodeIdentity>, mempool: std::sync::Arc<Mutex<Mempool>>) -> Self {
        Self { identity, mempool }
    }
}

#[async_trait]
impl TradeResultSubmitter for NodeTradeResultSubmitter {
    async fn submit_trade(&self, _trade_id: &str, player_a: &str, player_b: &str, card_a: &str, card_b: &str) {
        let tx = self.identity.sign_transaction(
            TransactionType::Trade,
            vec![player_a.to_string(), player_b.to_string(), card_a.to_string(), card_b.to_string()],
            now_secs(),
        );
        match self.mempool.lock().await.add(tx) {
            Ok(()) => TRADES_FINISHED.with_label_values(&["completed"]).inc(),
            Err(err) => warn!(player_a, player_b, error = %err, "failed to submit host-signed trade result"),
        }
    }
}
