//! # Transaction Pool
//!
//! Buffers client-submitted transactions between signature-verified ingress
//! and the moment a miner picks a batch for a block. No fee market or
//! nonce ordering — just a plain FIFO queue a miner drains.

use std::collections::{HashMap, VecDeque};

use tcg_signature::oracle;
use tcg_types::Transaction;
use tracing::{debug, warn};

use crate::errors::MempoolError;

/// FIFO transaction pool keyed by transaction id.
#[derive(Default)]
pub struct Mempool {
    order: VecDeque<String>,
    by_id: HashMap<String, Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Validates `tx`'s signature and data shape, then appends it to the
    /// back of the queue. Genesis transactions are rejected here — they
    /// belong only inside the genesis block, never the live pool.
    pub fn add(&mut self, tx: Transaction) -> Result<(), MempoolError> {
        if self.by_id.contains_key(&tx.id) {
            return Err(MempoolError::Duplicate(tx.id));
        }

        let expected = tx.tx_type.expected_fields();
        if tx.data.len() != expected {
            return Err(MempoolError::MalformedData {
                expected,
                actual: tx.data.len(),
            });
        }

        if !oracle::verify(&tx.public_key, &tx.user_data, &tx.signature) {
            warn!(tx_id = %tx.id, "rejected transaction with invalid signature");
            return Err(MempoolError::InvalidSignature);
        }

        debug!(tx_id = %tx.id, tx_type = ?tx.tx_type, "admitted transaction to mempool");
        self.order.push_back(tx.id.clone());
        self.by_id.insert(tx.id.clone(), tx);
        Ok(())
    }

    /// Removes every id in `ids` that is present, leaving the rest. Used
    /// after a block carrying these transactions is appended to the ledger.
    pub fn remove<'a, I: IntoIterator<Item = &'a str>>(&mut self, ids: I) {
        let mut doomed: std::collections::HashSet<&str> = ids.into_iter().collect();
        if doomed.is_empty() {
            return;
        }
        self.order.retain(|id| {
            if doomed.contains(id.as_str()) {
                self.by_id.remove(id);
                doomed.remove(id.as_str());
                false
            } else {
                true
            }
        });
    }

    /// Returns up to `limit` transactions in FIFO order, without removing
    /// them — a miner may lose the race and the pool must still hold them.
    pub fn snapshot(&self, limit: usize) -> Vec<Transaction> {
        self.order
            .iter()
            .take(limit)
            .filter_map(|id| self.by_id.get(id))
            .cloned()
            .collect()
    }
}
