//! Ledger error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("block's previousHash does not match the current chain tail")]
    InvalidPrevHash,

    #[error("block hash does not satisfy the Proof-of-Work target")]
    InvalidPoW,

    #[error("a transaction in this block carries an invalid signature")]
    InvalidTxSignature,
}
