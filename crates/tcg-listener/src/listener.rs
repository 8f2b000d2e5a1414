use std::sync::Arc;

use serde_json::json;
use tcg_bus::ReplyBus;
use tcg_directory::PlayerDirectory;
use tcg_types::{Block, ReplyEnvelope, ReplyKind, Transaction, TransactionType};
use tracing::warn;

use crate::booster::booster_for_tx;

/// Scans freshly appended blocks and fans out client-facing confirmations
/// for transactions touching a player connected to this node. Runs once
/// per append, local or remote, on every node — not just the miner.
pub struct BlockListener {
    local_server_id: String,
    directory: Arc<PlayerDirectory>,
    bus: Arc<dyn ReplyBus>,
}

impl BlockListener {
    pub fn new(local_server_id: impl Into<String>, directory: Arc<PlayerDirectory>, bus: Arc<dyn ReplyBus>) -> Self {
        Self {
            local_server_id: local_server_id.into(),
            directory,
            bus,
        }
    }

    pub async fn scan_block(&self, block: &Block) {
        for tx in &block.transactions {
            if tx.is_genesis() {
                continue;
            }
            self.process_transaction(tx).await;
        }
    }

    async fn process_transaction(&self, tx: &Transaction) {
        match tx.tx_type {
            TransactionType::Purchase => self.process_purchase(tx).await,
            TransactionType::Trade => self.process_trade(tx).await,
            TransactionType::BattleResult => self.process_battle_result(tx).await,
            TransactionType::Genesis => {}
        }
    }

    async fn notify_if_local(&self, player_id: &str, tipo: ReplyKind, payload: serde_json::Value) {
        let Some(entry) = self.directory.get(player_id).await else {
            return;
        };
        if entry.server_id != self.local_server_id {
            return;
        }
        self.bus
            .publish(&entry.reply_channel, ReplyEnvelope::new(tipo, payload))
            .await;
    }

    async fn process_purchase(&self, tx: &Transaction) {
        if tx.data.len() < TransactionType::Purchase.expected_fields() {
            warn!(tx_id = %tx.id, "purchase transaction carries too few data fields, skipping");
            return;
        }
        let buyer_id = &tx.data[0];
        let booster = booster_for_tx(&tx.id);
        self.notify_if_local(
            buyer_id,
            ReplyKind::PurchaseConfirmed,
            json!({
                "mensagem": "Sua compra foi confirmada na Blockchain!",
                "booster": booster,
                "txId": tx.id,
            }),
        )
        .await;
    }

    async fn process_trade(&self, tx: &Transaction) {
        if tx.data.len() < TransactionType::Trade.expected_fields() {
            warn!(tx_id = %tx.id, "trade transaction carries too few data fields, skipping");
            return;
        }
        let user1 = &tx.data[0];
        let user2 = &tx.data[1];
        for player_id in [user1, user2] {
            self.notify_if_local(
                player_id,
                ReplyKind::TradeConfirmed,
                json!({
                    "mensagem": "Troca realizada com sucesso na Blockchain!",
                    "txId": tx.id,
                }),
            )
            .await;
        }
    }

    async fn process_battle_result(&self, tx: &Transaction) {
        if tx.data.len() < TransactionType::BattleResult.expected_fields() {
            warn!(tx_id = %tx.id, "battle result transaction carries too few data fields, skipping");
            return;
        }
        let winner_id = &tx.data[2];
        self.notify_if_local(
            winner_id,
            ReplyKind::RankUpdate,
            json!({
                "mensagem": "Vitória registrada na Blockchain!",
                "txId": tx.id,
            }),
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use tcg_bus::InProcessReplyBus;
    use tcg_cluster::Cluster;
    use tcg_types::{PlayerDirectoryEntry, TransactionType};
    use tokio::time::timeout;

    async fn local_directory(local_id: &str) -> Arc<PlayerDirectory> {
        let mut server_list = HashMap::new();
        server_list.insert(local_id.to_string(), "127.0.0.1:1".to_string());
        let cluster = Cluster::with_interval(local_id.to_string(), server_list.clone(), Duration::from_secs(3600));
        cluster.probe_once().await;
        PlayerDirectory::new(cluster, server_list)
    }

    fn connected(player_id: &str, server_id: &str) -> PlayerDirectoryEntry {
        PlayerDirectoryEntry {
            player_id: player_id.to_string(),
            server_id: server_id.to_string(),
            server_host: "127.0.0.1:9000".to_string(),
            reply_channel: player_id.to_string(),
        }
    }

    fn tx(id: &str, tx_type: TransactionType, data: Vec<&str>) -> Transaction {
        Transaction {
            id: id.to_string(),
            tx_type,
            timestamp: 0,
            data: data.into_iter().map(String::from).collect(),
            user_data: Vec::new(),
            public_key: Vec::new(),
            signature: Vec::new(),
        }
    }

    #[tokio::test]
    async fn genesis_transaction_is_skipped() {
        let directory = local_directory("node-a").await;
        let bus = InProcessReplyBus::new();
        let mut sub = bus.subscribe("alice").await;
        directory.connect(connected("alice", "node-a")).await.unwrap();

        let listener = BlockListener::new("node-a", directory, bus.clone());
        let block = Block {
            timestamp: 0,
            previous_hash: Vec::new(),
            transactions: vec![Transaction::genesis()],
            nonce: 0,
            hash: Vec::new(),
        };
        listener.scan_block(&block).await;

        assert!(timeout(Duration::from_millis(50), sub.recv()).await.is_err());
    }

    #[tokio::test]
    async fn purchase_notifies_local_buyer_with_a_deterministic_booster() {
        let directory = local_directory("node-a").await;
        let bus = InProcessReplyBus::new();
        let mut sub = bus.subscribe("alice").await;
        directory.connect(connected("alice", "node-a")).await.unwrap();

        let listener = BlockListener::new("node-a", directory, bus.clone());
        let block = Block {
            timestamp: 0,
            previous_hash: Vec::new(),
            transactions: vec![tx("tx-1", TransactionType::Purchase, vec!["alice", "{}", "meta"])],
            nonce: 0,
            hash: Vec::new(),
        };
        listener.scan_block(&block).await;

        let received = timeout(Duration::from_millis(100), sub.recv()).await.unwrap().unwrap();
        assert_eq!(received.tipo, ReplyKind::PurchaseConfirmed);
        assert_eq!(received.payload["txId"], "tx-1");
        assert!(received.payload["booster"]["cards"].is_array());
    }

    #[tokio::test]
    async fn purchase_by_a_player_connected_elsewhere_is_not_delivered() {
        let directory = local_directory("node-a").await;
        let bus = InProcessReplyBus::new();
        let mut sub = bus.subscribe("alice").await;
        directory.connect(connected("alice", "node-b")).await.unwrap();

        let listener = BlockListener::new("node-a", directory, bus.clone());
        let block = Block {
            timestamp: 0,
            previous_hash: Vec::new(),
            transactions: vec![tx("tx-1", TransactionType::Purchase, vec!["alice", "{}", "meta"])],
            nonce: 0,
            hash: Vec::new(),
        };
        listener.scan_block(&block).await;

        assert!(timeout(Duration::from_millis(50), sub.recv()).await.is_err());
    }

    #[tokio::test]
    async fn trade_notifies_both_local_participants() {
        let directory = local_directory("node-a").await;
        let bus = InProcessReplyBus::new();
        let mut alice_sub = bus.subscribe("alice").await;
        let mut bob_sub = bus.subscribe("bob").await;
        directory.connect(connected("alice", "node-a")).await.unwrap();
        directory.connect(connected("bob", "node-a")).await.unwrap();

        let listener = BlockListener::new("node-a", directory, bus.clone());
        let block = Block {
            timestamp: 0,
            previous_hash: Vec::new(),
            transactions: vec![tx("tx-1", TransactionType::Trade, vec!["alice", "bob", "card-a", "card-b"])],
            nonce: 0,
            hash: Vec::new(),
        };
        listener.scan_block(&block).await;

        let alice_received = timeout(Duration::from_millis(100), alice_sub.recv()).await.unwrap().unwrap();
        let bob_received = timeout(Duration::from_millis(100), bob_sub.recv()).await.unwrap().unwrap();
        assert_eq!(alice_received.tipo, ReplyKind::TradeConfirmed);
        assert_eq!(bob_received.tipo, ReplyKind::TradeConfirmed);
    }

    #[tokio::test]
    async fn battle_result_notifies_only_the_winner() {
        let directory = local_directory("node-a").await;
        let bus = InProcessReplyBus::new();
        let mut winner_sub = bus.subscribe("alice").await;
        let mut loser_sub = bus.subscribe("bob").await;
        directory.connect(connected("alice", "node-a")).await.unwrap();
        directory.connect(connected("bob", "node-a")).await.unwrap();

        let listener = BlockListener::new("node-a", directory, bus.clone());
        let block = Block {
            timestamp: 0,
            previous_hash: Vec::new(),
            transactions: vec![tx(
                "tx-1",
                TransactionType::BattleResult,
                vec!["battle-1", "bob", "alice", "meta"],
            )],
            nonce: 0,
            hash: Vec::new(),
        };
        listener.scan_block(&block).await;

        let received = timeout(Duration::from_millis(100), winner_sub.recv()).await.unwrap().unwrap();
        assert_eq!(received.tipo, ReplyKind::RankUpdate);
        assert!(timeout(Duration::from_millis(50), loser_sub.recv()).await.is_err());
    }
}
