//! HTTP-facing error type. Internal subsystems return their own
//! `thiserror` enums; this is the single place those collapse into status
//! codes, per the process-boundary convention (`anyhow`/glue only at the
//! edge, typed enums everywhere inside).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use tcg_directory::DirectoryError;
use tcg_dispatcher::DispatcherError;
use tcg_ledger::LedgerError;
use tcg_mempool::MempoolError;
use tcg_match::MatchError;
use tcg_trade::TradeError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Mempool(#[from] MempoolError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Trade(#[from] TradeError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("{0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DispatcherError> for ApiError {
    fn from(err: DispatcherError) -> Self {
        match err {
            DispatcherError::Ledger(ledger_err) => ApiError::Ledger(ledger_err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Mempool(MempoolError::InvalidSignature) => StatusCode::UNAUTHORIZED,
            ApiError::Mempool(MempoolError::Duplicate(_) | MempoolError::MalformedData { .. }) => {
                StatusCode::GONE
            }
            ApiError::Mempool(MempoolError::UnknownId(_)) => StatusCode::NOT_FOUND,
            ApiError::Directory(DirectoryError::NotLeader) => StatusCode::FORBIDDEN,
            ApiError::Match(MatchError::MatchNotFound) => StatusCode::NOT_FOUND,
            ApiError::Match(MatchError::InvalidTurn | MatchError::InvalidCard(_)) => {
                StatusCode::CONFLICT
            }
            ApiError::Trade(TradeError::TradeNotFound) => StatusCode::NOT_FOUND,
            ApiError::Trade(TradeError::UnknownPlayer(_) | TradeError::AlreadyOffered(_)) => {
                StatusCode::CONFLICT
            }
            ApiError::Ledger(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}
