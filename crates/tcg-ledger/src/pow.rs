//! # Proof-of-Work Primitives
//!
//! The exact hash preimage and target comparison shared by block validation
//! (this crate) and block mining (`tcg-miner`): `SHA256(previousHash ||
//! JSON(transactions) || hex(timestamp) || hex(targetBits) || hex(nonce))`,
//! checked against `2^(256-targetBits)`.

use primitive_types::U256;
use tcg_crypto::sha256;
use tcg_types::Transaction;

/// Reference difficulty: 20 leading zero bits. Tests commonly override to a
/// much smaller value (e.g. 12) so mining completes in milliseconds.
pub const DEFAULT_TARGET_BITS: u32 = 20;

/// `2^(256-targetBits)`, the ceiling a block hash must fall under.
pub fn target(target_bits: u32) -> U256 {
    U256::one() << (256 - target_bits as usize)
}

/// Big-endian 8-byte encoding, matching the original system's integer wire
/// format for each field folded into the preimage.
fn be8(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Build the exact byte sequence that gets SHA-256'd for a candidate block.
pub fn preimage(
    previous_hash: &[u8],
    transactions: &[Transaction],
    timestamp: u64,
    target_bits: u32,
    nonce: u64,
) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(previous_hash);
    buf.extend_from_slice(
        &serde_json::to_vec(transactions).expect("transaction list always serializes"),
    );
    buf.extend_from_slice(&be8(timestamp));
    buf.extend_from_slice(&be8(target_bits as u64));
    buf.extend_from_slice(&be8(nonce));
    buf
}

/// Single SHA-256 over [`preimage`].
pub fn hash(
    previous_hash: &[u8],
    transactions: &[Transaction],
    timestamp: u64,
    target_bits: u32,
    nonce: u64,
) -> [u8; 32] {
    sha256(&preimage(previous_hash, transactions, timestamp, target_bits, nonce))
}

/// `bigint(hash) < target`.
pub fn meets_target(candidate_hash: &[u8; 32], target_bits: u32) -> bool {
    U256::from_big_endian(candidate_hash) < target(target_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_halves_for_each_extra_bit() {
        let t20 = target(20);
        let t21 = target(21);
        assert_eq!(t20, t21 * U256::from(2));
    }

    #[test]
    fn hash_is_deterministic_for_same_inputs() {
        let txs = vec![Transaction::genesis()];
        let a = hash(&[], &txs, 1000, 12, 42);
        let b = hash(&[], &txs, 1000, 12, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn hash_changes_with_nonce() {
        let txs = vec![Transaction::genesis()];
        let a = hash(&[], &txs, 1000, 12, 1);
        let b = hash(&[], &txs, 1000, 12, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn all_zero_hash_always_meets_target() {
        assert!(meets_target(&[0u8; 32], 24));
    }

    #[test]
    fn all_ff_hash_never_meets_target() {
        assert!(!meets_target(&[0xFFu8; 32], 24));
    }
}
