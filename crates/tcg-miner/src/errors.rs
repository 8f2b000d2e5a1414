//! Miner error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MinerError {
    #[error("mining cancelled")]
    Cancelled,
}
