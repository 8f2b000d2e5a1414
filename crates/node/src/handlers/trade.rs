//! Trade endpoints, mirroring the battle relay pattern: `/trade/initiate`
//! serves both the client-facing call and the host-to-peer setup relay,
//! `/trade/submit_card` forwards to whichever side actually hosts the
//! coordinator, and `/trade/request_card` / `/trade/result` are thin
//! relay/cleanup endpoints for the peer side.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tcg_types::{ReplyEnvelope, ReplyKind};
use uuid::Uuid;

use crate::adapters::NodeTradeResultSubmitter;
use crate::dto::{SubmitCardRequest, TradeInitiateRequest, TradeInitiateResponse, TradeResultRelayRequest};
use crate::errors::ApiError;
use crate::state::{Node, PeerTradeInfo, TradeEntry};

const RELAY_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn trade_initiate(
    State(node): State<Arc<Node>>,
    Json(req): Json<TradeInitiateRequest>,
) -> Result<Json<TradeInitiateResponse>, ApiError> {
    match req.host_url {
        None => initiate_as_host(node, req).await,
        Some(host_url) => initiate_as_peer(node, host_url, req).await,
    }
}

async fn initiate_as_host(
    node: Arc<Node>,
    req: TradeInitiateRequest,
) -> Result<Json<TradeInitiateResponse>, ApiError> {
    let trade_id = Uuid::new_v4().to_string();

    let b_entry = node.directory.get(&req.player_b).await;
    let b_is_local = b_entry
        .as_ref()
        .map(|entry| entry.server_id == node.config.server_id)
        .unwrap_or(true);

    if !b_is_local {
        let entry = b_entry.expect("checked above");
        let relay = TradeInitiateRequest {
            trade_id: Some(trade_id.clone()),
            host_url: Some(node.local_host().to_string()),
            player_a: req.player_a.clone(),
            player_b: req.player_b.clone(),
        };
        let url = format!("http://{}/trade/initiate", entry.server_host);
        let _ = node.http.post(&url).timeout(RELAY_TIMEOUT).json(&relay).send().await;
    }

    let submitter = Arc::new(NodeTradeResultSubmitter::new(node.identity.clone(), node.mempool.clone()));
    let handle = tcg_trade::spawn(trade_id.clone(), req.player_a.clone(), req.player_b.clone(), submitter, node.trade_timeout());
    node.trades.write().await.insert(trade_id.clone(), TradeEntry::Host(handle));

    notify_if_local(&node, &req.player_a, &trade_id).await;
    if b_is_local {
        notify_if_local(&node, &req.player_b, &trade_id).await;
    }

    Ok(Json(TradeInitiateResponse { trade_id }))
}

async fn initiate_as_peer(
    node: Arc<Node>,
    host_url: String,
    req: TradeInitiateRequest,
) -> Result<Json<TradeInitiateResponse>, ApiError> {
    let trade_id = req
        .trade_id
        .ok_or_else(|| ApiError::BadRequest("relay setup call must carry trade_id".to_string()))?;

    node.trades.write().await.insert(
        trade_id.clone(),
        TradeEntry::Peer(PeerTradeInfo {
            trade_id: trade_id.clone(),
            host_url,
            local_player: req.player_b.clone(),
        }),
    );

    notify_if_local(&node, &req.player_b, &trade_id).await;

    Ok(Json(TradeInitiateResponse { trade_id }))
}

async fn notify_if_local(node: &Node, player_id: &str, trade_id: &str) {
    if let Some(entry) = node.directory.get(player_id).await {
        node.bus
            .publish(
                &entry.reply_channel,
                ReplyEnvelope::new(ReplyKind::TradeStarted, json!({"tradeId": trade_id})),
            )
            .await;
    }
}

pub async fn trade_submit_card(
    State(node): State<Arc<Node>>,
    Json(req): Json<SubmitCardRequest>,
) -> Result<StatusCode, ApiError> {
    let trades = node.trades.read().await;
    match trades.get(&req.trade_id) {
        Some(TradeEntry::Host(handle)) => {
            handle.offer_card(req.player_id.clone(), req.card_id.clone()).await?;
            Ok(StatusCode::OK)
        }
        Some(TradeEntry::Peer(info)) => {
            let url = format!("{}/trade/submit_card", info.host_url);
            let http = node.http.clone();
            drop(trades);
            match http.post(&url).timeout(RELAY_TIMEOUT).json(&req).send().await {
                Ok(resp) if resp.status().is_success() => Ok(StatusCode::OK),
                Ok(resp) => Ok(StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)),
                Err(err) => Err(ApiError::Internal(format!("failed to relay card offer to host: {err}"))),
            }
        }
        None => Err(tcg_trade::TradeError::TradeNotFound.into()),
    }
}

/// Reminds the peer server's local player to submit their card. An
/// idempotent nudge; nothing in this flow requires it to ever fire more
/// than once.
pub async fn trade_request_card(State(node): State<Arc<Node>>, Json(req): Json<TradeResultRelayRequest>) -> StatusCode {
    let trades = node.trades.read().await;
    let Some(TradeEntry::Peer(info)) = trades.get(&req.trade_id) else {
        return StatusCode::NOT_FOUND;
    };
    let player_id = info.local_player.clone();
    drop(trades);
    notify_if_local(&node, &player_id, &req.trade_id).await;
    StatusCode::OK
}

/// Tears down this node's peer-side bookkeeping once the host reports the
/// trade concluded. The host never calls this automatically in this
/// implementation — `tcg_trade::spawn`'s coordinator task exposes no
/// completion signal back to `Node` — so in practice this endpoint is
/// reachable but unused; documented as an accepted limitation.
pub async fn trade_result(State(node): State<Arc<Node>>, Json(req): Json<TradeResultRelayRequest>) -> StatusCode {
    node.trades.write().await.remove(&req.trade_id);
    StatusCode::OK
}
