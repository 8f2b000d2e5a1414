//! Match coordinator error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("match not found")]
    MatchNotFound,

    #[error("it is not this player's turn")]
    InvalidTurn,

    #[error("card {0} is not in this player's hand")]
    InvalidCard(String),
}
