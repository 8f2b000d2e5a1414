//! Trade coordinator error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TradeError {
    #[error("trade not found")]
    TradeNotFound,

    #[error("{0} is not a participant in this trade")]
    UnknownPlayer(String),

    #[error("{0} already offered a card")]
    AlreadyOffered(String),
}
