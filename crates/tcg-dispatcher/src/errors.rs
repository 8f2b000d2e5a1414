//! Dispatcher error types.

use thiserror::Error;
use tcg_ledger::LedgerError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatcherError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
