//! Mempool error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MempoolError {
    #[error("transaction signature does not verify")]
    InvalidSignature,

    #[error("transaction id {0} already present in the pool")]
    Duplicate(String),

    #[error("data field has {actual} entries, expected {expected} for this transaction type")]
    MalformedData { expected: usize, actual: usize },

    #[error("transaction {0} not found")]
    UnknownId(String),
}
