//! # Ledger Chain State
//!
//! The single-writer, many-reader append-only chain. `append` is the only
//! mutation path during normal operation; `adopt` wholesale-replaces the
//! chain during Nakamoto synchronization.

use tcg_signature::oracle;
use tcg_types::Transaction;
use tracing::{info, warn};

use crate::errors::LedgerError;
use crate::pow;
use tcg_types::Block;

/// The append-only Proof-of-Work ledger.
pub struct Ledger {
    target_bits: u32,
    blocks: Vec<Block>,
}

impl Ledger {
    /// Build a fresh ledger seeded with the distinguished genesis block.
    pub fn genesis(target_bits: u32) -> Self {
        let transactions = vec![Transaction::genesis()];
        let previous_hash: Vec<u8> = Vec::new();
        let timestamp = 0;
        let nonce = 0;
        let hash = pow::hash(&previous_hash, &transactions, timestamp, target_bits, nonce).to_vec();
        let genesis_block = Block {
            timestamp,
            previous_hash,
            transactions,
            nonce,
            hash,
        };
        Self {
            target_bits,
            blocks: vec![genesis_block],
        }
    }

    pub fn target_bits(&self) -> u32 {
        self.target_bits
    }

    pub fn height(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn last_hash(&self) -> Vec<u8> {
        self.blocks
            .last()
            .expect("ledger always carries at least the genesis block")
            .hash
            .clone()
    }

    /// Checks (a) `block.previousHash == lastHash()`, (b) the hash
    /// recomputes and satisfies the Proof-of-Work target, (c) every
    /// non-genesis transaction carries a valid signature.
    pub fn validate(&self, block: &Block) -> Result<(), LedgerError> {
        if block.previous_hash != self.last_hash() {
            return Err(LedgerError::InvalidPrevHash);
        }
        validate_block_self_consistent(block, self.target_bits)
    }

    /// Appends `block` after validating it against the current tail.
    pub fn append(&mut self, block: Block) -> Result<(), LedgerError> {
        self.validate(&block)?;
        info!(height = self.blocks.len(), hash = %hex::encode(&block.hash), "block appended");
        self.blocks.push(block);
        Ok(())
    }

    /// Validates a candidate chain end-to-end: genesis-first linkage, every
    /// block's Proof-of-Work, and every non-genesis transaction signature.
    fn is_valid_chain(&self, candidate: &[Block]) -> bool {
        if candidate.is_empty() {
            return false;
        }
        let mut previous_hash: Vec<u8> = Vec::new();
        for (index, block) in candidate.iter().enumerate() {
            if index > 0 && block.previous_hash != previous_hash {
                return false;
            }
            if validate_block_self_consistent(block, self.target_bits).is_err() {
                return false;
            }
            previous_hash = block.hash.clone();
        }
        true
    }

    /// Nakamoto synchronization: if `candidate` is longer than the local
    /// chain and validates end-to-end, replace the local chain wholesale.
    /// Equal-height candidates are adopted only when `peer_id` sorts lower
    /// than `local_id`, per the lower-peer-ID tie-break rule.
    pub fn adopt_if_better(
        &mut self,
        candidate: Vec<Block>,
        peer_id: &str,
        local_id: &str,
    ) -> bool {
        let candidate_wins_height = candidate.len() > self.blocks.len();
        let tie_broken_by_id = candidate.len() == self.blocks.len() && peer_id < local_id;

        if !candidate_wins_height && !tie_broken_by_id {
            return false;
        }

        if !self.is_valid_chain(&candidate) {
            warn!(peer_id, "rejected candidate chain: failed end-to-end validation");
            return false;
        }

        info!(
            peer_id,
            old_height = self.blocks.len(),
            new_height = candidate.len(),
            "adopted peer chain via Nakamoto sync"
        );
        self.blocks = candidate;
        true
    }
}

/// Checks the invariants a single block must satisfy in isolation: its own
/// hash recomputes correctly, satisfies the Proof-of-Work target, and every
/// non-genesis transaction's signature verifies. Does not check linkage to
/// a predecessor — callers with a chain context do that separately.
fn validate_block_self_consistent(block: &Block, target_bits: u32) -> Result<(), LedgerError> {
    let recomputed = pow::hash(
        &block.previous_hash,
        &block.transactions,
        block.timestamp,
        target_bits,
        block.nonce,
    );
    if recomputed.as_slice() != block.hash.as_slice() || !pow::meets_target(&recomputed, target_bits)
    {
        return Err(LedgerError::InvalidPoW);
    }

    for tx in &block.transactions {
        if tx.is_genesis() {
            continue;
        }
        if !oracle::verify(&tx.public_key, &tx.user_data, &tx.signature) {
            return Err(LedgerError::InvalidTxSignature);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcg_crypto::{sha256, P256KeyPair};
    use tcg_types::TransactionType;

    const TEST_BITS: u32 = 8;

    fn mine(previous_hash: Vec<u8>, transactions: Vec<Transaction>, timestamp: u64) -> Block {
        let mut nonce = 0u64;
        loop {
            let h = pow::hash(&previous_hash, &transactions, timestamp, TEST_BITS, nonce);
            if pow::meets_target(&h, TEST_BITS) {
                return Block {
                    timestamp,
                    previous_hash,
                    transactions,
                    nonce,
                    hash: h.to_vec(),
                };
            }
            nonce += 1;
        }
    }

    fn signed_purchase(keypair: &P256KeyPair, id: &str) -> Transaction {
        let user_data = vec![
            "payload".to_string(),
            "1000".to_string(),
            "alice".to_string(),
            "PURCHASE".to_string(),
        ];
        let digest = sha256(&serde_json::to_vec(&user_data).unwrap());
        let signature = keypair.sign(&digest).to_r_s_bytes();
        Transaction {
            id: id.to_string(),
            tx_type: TransactionType::Purchase,
            timestamp: 1000,
            data: vec!["alice".to_string(), "{}".to_string(), "meta".to_string()],
            user_data,
            public_key: keypair.public_key().to_sec1_bytes(),
            signature,
        }
    }

    #[test]
    fn genesis_ledger_starts_at_height_one() {
        let ledger = Ledger::genesis(TEST_BITS);
        assert_eq!(ledger.height(), 1);
    }

    #[test]
    fn append_valid_block_advances_tail() {
        let mut ledger = Ledger::genesis(TEST_BITS);
        let keypair = P256KeyPair::generate();
        let block = mine(
            ledger.last_hash(),
            vec![signed_purchase(&keypair, "tx-1")],
            2000,
        );
        ledger.append(block.clone()).unwrap();
        assert_eq!(ledger.height(), 2);
        assert_eq!(ledger.last_hash(), block.hash);
    }

    #[test]
    fn append_rejects_wrong_prev_hash() {
        let mut ledger = Ledger::genesis(TEST_BITS);
        let mut block = mine(ledger.last_hash(), vec![], 2000);
        block.previous_hash = vec![0xAA; 32];
        let err = ledger.append(block).unwrap_err();
        assert_eq!(err, LedgerError::InvalidPrevHash);
    }

    #[test]
    fn append_rejects_hash_not_meeting_target() {
        let mut ledger = Ledger::genesis(TEST_BITS);
        let mut block = mine(ledger.last_hash(), vec![], 2000);
        block.nonce += 1;
        let err = ledger.append(block).unwrap_err();
        assert_eq!(err, LedgerError::InvalidPoW);
    }

    #[test]
    fn append_rejects_tampered_transaction_signature() {
        let mut ledger = Ledger::genesis(TEST_BITS);
        let keypair = P256KeyPair::generate();
        let mut tx = signed_purchase(&keypair, "tx-1");
        tx.signature[0] ^= 0xFF;
        let block = mine(ledger.last_hash(), vec![tx], 2000);
        let err = ledger.append(block).unwrap_err();
        assert_eq!(err, LedgerError::InvalidTxSignature);
    }

    #[test]
    fn adopt_if_better_replaces_shorter_local_chain() {
        let mut local = Ledger::genesis(TEST_BITS);
        let mut peer = Ledger::genesis(TEST_BITS);
        let keypair = P256KeyPair::generate();
        let block = mine(
            peer.last_hash(),
            vec![signed_purchase(&keypair, "tx-1")],
            2000,
        );
        peer.append(block).unwrap();

        assert!(local.adopt_if_better(peer.blocks().to_vec(), "node-a", "node-b"));
        assert_eq!(local.height(), 2);
    }

    #[test]
    fn adopt_if_better_rejects_equal_height_unless_tie_broken() {
        let mut local = Ledger::genesis(TEST_BITS);
        let candidate = local.blocks().to_vec();
        assert!(!local.adopt_if_better(candidate.clone(), "node-z", "node-a"));
        assert!(local.adopt_if_better(candidate, "node-a", "node-z"));
    }

    #[test]
    fn adopt_if_better_rejects_invalid_candidate_chain() {
        let mut local = Ledger::genesis(TEST_BITS);
        let mut bogus = local.blocks().to_vec();
        bogus.push(Block {
            timestamp: 1,
            previous_hash: local.last_hash(),
            transactions: vec![],
            nonce: 0,
            hash: vec![0u8; 32],
        });
        assert!(!local.adopt_if_better(bogus, "node-a", "node-z"));
        assert_eq!(local.height(), 1);
    }
}
