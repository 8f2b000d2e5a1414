//! Wire-level request/response bodies for this node's HTTP surface. Kept
//! separate from `tcg_types` because these shapes are this node's own
//! transport concern, not a cross-subsystem domain entity.

use serde::{Deserialize, Serialize};
use tcg_types::{Block, PlayerDirectoryEntry, TransactionType};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub server_id: String,
    pub is_leader: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlockchainResponse {
    pub height: usize,
    pub ledger: Vec<Block>,
}

#[derive(Debug, Serialize)]
pub struct MempoolResponse {
    pub count: usize,
    pub mempool: Vec<tcg_types::Transaction>,
}

/// `POST /players/connect` body: one new entry, accepted only by the leader.
pub type ConnectRequest = PlayerDirectoryEntry;

/// `POST /players/update` body: the leader's full directory snapshot, as
/// pushed to every follower after each accepted connect.
pub type UpdateRequest = std::collections::HashMap<String, PlayerDirectoryEntry>;

#[derive(Debug, Serialize)]
pub struct Accepted {
    pub tx_id: String,
}

/// `POST /cards/buy`, `/battle/register`, `/trade/register` all accept
/// this shape: a client-signed transaction minus `timestamp`, which the
/// server assigns on ingress. `id` is supplied by the client (not the
/// server) so that retrying an identical submission after a dropped
/// response collides with the first attempt in the mempool's dedup check
/// instead of silently admitting a second copy.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub data: Vec<String>,
    pub user_data: Vec<String>,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Body for `POST /battle/initiate`. Absent `host_url` means a client is
/// starting a new battle against this node; present `host_url` means the
/// actual host server is relaying match setup to the server hosting J2.
#[derive(Debug, Serialize, Deserialize)]
pub struct BattleInitiateRequest {
    pub match_id: Option<String>,
    pub host_url: Option<String>,
    pub player_j1: String,
    pub player_j2: String,
    pub hand_j1: Vec<String>,
    pub hand_j2: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BattleInitiateResponse {
    pub match_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitMoveRequest {
    pub match_id: String,
    pub player_id: String,
    pub card_id: String,
    pub damage: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GiveUpRequest {
    pub match_id: String,
    pub player_id: String,
}

/// Body for `POST /trade/initiate`, mirroring `BattleInitiateRequest`.
#[derive(Debug, Serialize, Deserialize)]
pub struct TradeInitiateRequest {
    pub trade_id: Option<String>,
    pub host_url: Option<String>,
    pub player_a: String,
    pub player_b: String,
}

#[derive(Debug, Serialize)]
pub struct TradeInitiateResponse {
    pub trade_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitCardRequest {
    pub trade_id: String,
    pub player_id: String,
    pub card_id: String,
}

#[derive(Debug, Deserialize)]
pub struct EndRelayRequest {
    pub match_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TradeResultRelayRequest {
    pub trade_id: String,
}
