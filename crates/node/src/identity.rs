//! This node's own signing identity.
//!
//! The host authors BattleResult and Trade transactions "on behalf of its
//! authority over the match" (Design Note, Open Question 1/4 resolution);
//! someone has to hold the key that signs them. Since the originating
//! client signer is explicitly out of scope and the ledger is in-memory
//! only (no persistence non-goal), this node generates a fresh P-256
//! keypair once at process start and uses it for every transaction it
//! authors itself.

use tcg_crypto::{sha256, P256KeyPair};
use tcg_types::Transaction;
use tcg_types::TransactionType;
use uuid::Uuid;

pub struct NodeIdentity {
    keypair: P256KeyPair,
}

impl NodeIdentity {
    pub fn generate() -> Self {
        Self {
            keypair: P256KeyPair::generate(),
        }
    }

    /// Build and sign a transaction of `tx_type` with `data` as the
    /// type-specific payload, server-assigning `id` and `timestamp`.
    pub fn sign_transaction(&self, tx_type: TransactionType, data: Vec<String>, timestamp: u64) -> Transaction {
        let payload = serde_json::to_string(&data).expect("string vec always serializes");
        let user_data = vec![
            payload,
            timestamp.to_string(),
            "host".to_string(),
            tx_type.as_wire_str().to_string(),
        ];
        let digest = sha256(&serde_json::to_vec(&user_data).expect("string vec always serializes"));
        let signature = self.keypair.sign(&digest).to_r_s_bytes();

        Transaction {
            id: Uuid::new_v4().to_string(),
            tx_type,
            timestamp,
            data,
            user_data,
            public_key: self.keypair.public_key().to_sec1_bytes(),
            signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};
    use tcg_signature::oracle;

    #[test]
    fn host_signed_transaction_verifies() {
        let identity = NodeIdentity::generate();
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        let tx = identity.sign_transaction(
            TransactionType::BattleResult,
            vec!["battle-1".into(), "host".into(), "alice".into(), "round=3".into()],
            now,
        );
        assert!(oracle::verify(&tx.public_key, &tx.user_data, &tx.signature));
    }
}
