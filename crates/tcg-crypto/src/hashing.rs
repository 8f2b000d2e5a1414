//! SHA-256 hashing used throughout the ledger: transaction signing digests
//! and the block Proof-of-Work preimage both reduce to this single helper.

use sha2::{Digest, Sha256};

/// One-shot SHA-256 over `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}
