//! Generic signed-transaction ingress shared by `/cards/buy`,
//! `/battle/register`, and `/trade/register`: every one of these accepts a
//! client-signed transaction, server-assigns `id` and `timestamp`, and
//! admits it to the mempool. The actual confirmation reaches the client
//! later, over the reply bus, once the listener sees it mined (§4.11) —
//! this endpoint only reports whether the mempool accepted it.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tcg_telemetry::{MEMPOOL_SIZE, TRANSACTIONS_RECEIVED};
use tcg_types::{Transaction, TransactionType};

use crate::dto::{Accepted, TransactionRequest};
use crate::errors::ApiError;
use crate::state::Node;

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_secs()
}

async fn admit(node: &Node, req: TransactionRequest) -> Result<Accepted, ApiError> {
    let tx = Transaction {
        id: req.id,
        tx_type: req.tx_type,
        timestamp: now_secs(),
        data: req.data,
        user_data: req.user_data,
        public_key: req.public_key,
        signature: req.signature,
    };
    let tx_id = tx.id.clone();
    node.mempool.lock().await.add(tx)?;

    TRANSACTIONS_RECEIVED.inc();
    MEMPOOL_SIZE.set(node.mempool.lock().await.len() as f64);

    Ok(Accepted { tx_id })
}

pub async fn buy_card(
    State(node): State<Arc<Node>>,
    Json(req): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<Accepted>), ApiError> {
    if req.tx_type != TransactionType::Purchase {
        return Err(ApiError::BadRequest("expected a Purchase transaction".to_string()));
    }
    let accepted = admit(&node, req).await?;
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

pub async fn register_battle_result(
    State(node): State<Arc<Node>>,
    Json(req): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<Accepted>), ApiError> {
    if req.tx_type != TransactionType::BattleResult {
        return Err(ApiError::BadRequest("expected a BattleResult transaction".to_string()));
    }
    let accepted = admit(&node, req).await?;
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

pub async fn register_trade(
    State(node): State<Arc<Node>>,
    Json(req): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<Accepted>), ApiError> {
    if req.tx_type != TransactionType::Trade {
        return Err(ApiError::BadRequest("expected a Trade transaction".to_string()));
    }
    let accepted = admit(&node, req).await?;
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}
