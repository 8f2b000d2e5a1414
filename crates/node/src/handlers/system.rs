//! Health, chain introspection, and metrics scrape endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tcg_ledger::LedgerError;
use tcg_telemetry::{encode_metrics, BLOCKS_APPENDED, CHAIN_HEIGHT};
use tracing::warn;

use crate::dto::{BlockchainResponse, HealthResponse, MempoolResponse};
use crate::errors::ApiError;
use crate::state::Node;

pub async fn health(State(node): State<Arc<Node>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        server_id: node.config.server_id.clone(),
        is_leader: node.cluster.is_leader().await,
    })
}

pub async fn get_blockchain(State(node): State<Arc<Node>>) -> Json<BlockchainResponse> {
    let ledger = node.ledger.lock().await;
    Json(BlockchainResponse {
        height: ledger.height(),
        ledger: ledger.blocks().to_vec(),
    })
}

pub async fn get_mempool(State(node): State<Arc<Node>>) -> Json<MempoolResponse> {
    let mempool = node.mempool.lock().await;
    Json(MempoolResponse {
        count: mempool.len(),
        mempool: mempool.snapshot(mempool.len()),
    })
}

/// Receives a candidate block from a peer. Status codes follow the named
/// surface literally: 200 on acceptance, 406 when the block itself is
/// invalid (bad previous hash, PoW, or an embedded signature), 408 is
/// reserved for a staleness check this implementation does not perform
/// (`LedgerError` carries no such variant).
pub async fn post_block(
    State(node): State<Arc<Node>>,
    Json(block): Json<tcg_types::Block>,
) -> impl IntoResponse {
    let hash = hex::encode(&block.hash);
    match node.dispatcher.handle_incoming_block(block).await {
        Ok(()) => {
            let ledger = node.ledger.lock().await;
            CHAIN_HEIGHT.set(ledger.height() as f64);
            BLOCKS_APPENDED.inc();
            tracing::info!(%hash, height = ledger.height(), "accepted block from peer");
            StatusCode::OK
        }
        Err(err) => {
            warn!(%hash, error = %err, "rejected block posted by peer");
            match err {
                tcg_dispatcher::DispatcherError::Ledger(
                    LedgerError::InvalidPrevHash | LedgerError::InvalidPoW | LedgerError::InvalidTxSignature,
                ) => StatusCode::NOT_ACCEPTABLE,
            }
        }
    }
}

pub async fn metrics() -> Result<String, ApiError> {
    encode_metrics().map_err(|err| ApiError::Internal(err.to_string()))
}
