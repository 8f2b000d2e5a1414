//! Reply bus error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    #[error("reply bus is closed")]
    Closed,
}
