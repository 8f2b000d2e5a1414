//! # Core Domain Entities
//!
//! Defines the wire-level entities that flow between nodes: signed
//! transactions, mined blocks, and the player-directory record that lets a
//! leader route reply-bus notifications to the right server.
//!
//! ## Clusters
//!
//! - **Ledger**: [`Transaction`], [`TransactionType`], [`Block`]
//! - **Cluster**: [`PlayerDirectoryEntry`]
//! - **Gameplay**: [`BattleOutcome`]

use serde::{Deserialize, Serialize};

/// A 32-byte SHA-256 hash.
pub type Hash = [u8; 32];

/// The three transaction kinds that can be committed to the ledger, plus the
/// distinguished genesis marker. `data` payload shape depends on the variant;
/// see [`TransactionType::expected_fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// `data = [buyerID, boosterJSON, metadata]`
    Purchase,
    /// `data = [user1ID, user2ID, card1ID, card2ID]`
    Trade,
    /// `data = [battleID, reporterID, winnerID, metadata]`
    BattleResult,
    /// The single dummy transaction carried by the genesis block.
    Genesis,
}

impl TransactionType {
    /// Number of strings `data` must carry for this transaction type.
    pub fn expected_fields(self) -> usize {
        match self {
            TransactionType::Purchase => 3,
            TransactionType::Trade => 4,
            TransactionType::BattleResult => 4,
            TransactionType::Genesis => 0,
        }
    }

    /// The exact string this type serializes to inside the signed
    /// `userData` tuple. Must stay byte-stable between signer and verifier.
    pub fn as_wire_str(self) -> &'static str {
        match self {
            TransactionType::Purchase => "PURCHASE",
            TransactionType::Trade => "TRADE",
            TransactionType::BattleResult => "BATTLE_RESULT",
            TransactionType::Genesis => "GENESIS",
        }
    }
}

/// The atomic unit committed to the ledger.
///
/// `userData` is the exact four-tuple `[payload, timestamp, userID, type]`
/// the client signed; `data` is the type-specific payload actually consumed
/// by the listener. The two overlap in content but are kept as separate
/// fields because `userData`'s serialization is frozen by the signing
/// contract while `data` is free to evolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Globally unique transaction id.
    pub id: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    /// Seconds since epoch, server-assigned on ingress.
    pub timestamp: u64,
    /// Type-specific payload, see [`TransactionType::expected_fields`].
    pub data: Vec<String>,
    /// The `[payload, timestamp, userID, type]` tuple that was signed.
    pub user_data: Vec<String>,
    /// Serialized P-256 public key, uncompressed SEC1 (65 bytes).
    pub public_key: Vec<u8>,
    /// `R || S`, each padded to 32 bytes.
    pub signature: Vec<u8>,
}

impl Transaction {
    /// Builds the distinguished genesis transaction. Carries no signature:
    /// validators skip signature checks for `TransactionType::Genesis`.
    pub fn genesis() -> Self {
        Self {
            id: "genesis".to_string(),
            tx_type: TransactionType::Genesis,
            timestamp: 0,
            data: Vec::new(),
            user_data: Vec::new(),
            public_key: Vec::new(),
            signature: Vec::new(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.tx_type == TransactionType::Genesis
    }
}

/// An immutable ledger entry. `hash` and `nonce` are only meaningful once a
/// miner has solved the Proof-of-Work puzzle for `previous_hash || transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub timestamp: u64,
    pub previous_hash: Vec<u8>,
    pub transactions: Vec<Transaction>,
    pub nonce: u64,
    pub hash: Vec<u8>,
}

/// The leader-owned record of where a connected player can be reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDirectoryEntry {
    pub player_id: String,
    pub server_id: String,
    pub server_host: String,
    pub reply_channel: String,
}

/// Outcome of a finished battle, used to build the signed `BattleResult`
/// transaction the host submits on behalf of its authority over the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Forfeit,
    Victory,
}
