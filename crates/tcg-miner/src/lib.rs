//! # tcg-miner
//!
//! Proof-of-Work search with cooperative cancellation. The CPU-bound loop
//! runs on a blocking thread so it never starves the async runtime; the
//! dispatcher (`tcg-dispatcher`) signals cancellation through a
//! `tokio::sync::watch<bool>` shared with every in-flight mining round.

mod errors;

pub use errors::MinerError;

use tcg_ledger::pow;
use tcg_types::Transaction;
use tokio::sync::watch;
use tracing::{debug, info};

/// Search for a nonce whose block hash satisfies the Proof-of-Work target,
/// polling `cancel` after every hash attempt. Returns `(nonce, hash)` on
/// success or [`MinerError::Cancelled`] the first time `cancel` reads
/// `true` — the in-flight nonce is discarded either way.
pub async fn mine(
    previous_hash: Vec<u8>,
    transactions: Vec<Transaction>,
    timestamp: u64,
    target_bits: u32,
    mut cancel: watch::Receiver<bool>,
) -> Result<(u64, [u8; 32]), MinerError> {
    let handle = tokio::task::spawn_blocking(move || {
        let mut nonce: u64 = 0;
        loop {
            let candidate = pow::hash(&previous_hash, &transactions, timestamp, target_bits, nonce);
            if pow::meets_target(&candidate, target_bits) {
                info!(nonce, "found block satisfying target");
                return Ok((nonce, candidate));
            }
            if *cancel.borrow() {
                debug!(nonce, "mining cancelled");
                return Err(MinerError::Cancelled);
            }
            nonce = nonce.wrapping_add(1);
        }
    });
    handle.await.expect("mining task panicked")
}
