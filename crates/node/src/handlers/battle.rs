//! Battle endpoints. `/battle/initiate` does double duty: a client hits it
//! on its own connected server to start a match (no `host_url` in the
//! body); the resulting host then relays a second call, this time carrying
//! `host_url`, to the server hosting J2 so that side can track the match
//! too. The remaining routes are pure inter-server relay, dispatched to
//! whichever local record (`Host` or `Peer`) this node holds for the match.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tcg_match::{MatchState, PeerBattleInfo};
use tcg_types::{ReplyEnvelope, ReplyKind};
use tracing::warn;
use uuid::Uuid;

use crate::adapters::{NodeBattleResultSubmitter, NodeMatchNotifier};
use crate::dto::{BattleInitiateRequest, BattleInitiateResponse, EndRelayRequest, GiveUpRequest, SubmitMoveRequest};
use crate::errors::ApiError;
use crate::state::{MatchEntry, Node};

const RELAY_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn initiate(
    State(node): State<Arc<Node>>,
    Json(req): Json<BattleInitiateRequest>,
) -> Result<Json<BattleInitiateResponse>, ApiError> {
    match req.host_url {
        None => initiate_as_host(node, req).await,
        Some(host_url) => initiate_as_peer(node, host_url, req).await,
    }
}

async fn initiate_as_host(
    node: Arc<Node>,
    req: BattleInitiateRequest,
) -> Result<Json<BattleInitiateResponse>, ApiError> {
    let match_id = Uuid::new_v4().to_string();

    let j2_entry = node.directory.get(&req.player_j2).await;
    let j2_is_local = j2_entry
        .as_ref()
        .map(|entry| entry.server_id == node.config.server_id)
        .unwrap_or(true);

    if !j2_is_local {
        let entry = j2_entry.expect("checked above");
        let relay = BattleInitiateRequest {
            match_id: Some(match_id.clone()),
            host_url: Some(node.local_host().to_string()),
            player_j1: req.player_j1.clone(),
            player_j2: req.player_j2.clone(),
            hand_j1: req.hand_j1.clone(),
            hand_j2: req.hand_j2.clone(),
        };
        let url = format!("http://{}/battle/initiate", entry.server_host);
        if let Err(err) = node.http.post(&url).timeout(RELAY_TIMEOUT).json(&relay).send().await {
            warn!(player = %req.player_j2, %url, error = %err, "failed to relay battle setup to peer server");
        }
    }

    let peer_server_id = j2_entry.map(|e| e.server_id).unwrap_or_else(|| node.config.server_id.clone());
    let state = MatchState::new(
        &match_id,
        &node.config.server_id,
        &peer_server_id,
        &req.player_j1,
        &req.player_j2,
        req.hand_j1,
        req.hand_j2,
    );

    let notifier = Arc::new(NodeMatchNotifier::new(
        node.config.server_id.clone(),
        node.directory.clone(),
        node.reply_bus(),
    ));
    let submitter = Arc::new(NodeBattleResultSubmitter::new(
        node.config.server_id.clone(),
        node.identity.clone(),
        node.mempool.clone(),
    ));
    let handle = tcg_match::spawn(state, notifier, submitter, node.turn_timeout());

    node.matches.write().await.insert(match_id.clone(), MatchEntry::Host(handle));

    Ok(Json(BattleInitiateResponse { match_id }))
}

async fn initiate_as_peer(
    node: Arc<Node>,
    host_url: String,
    req: BattleInitiateRequest,
) -> Result<Json<BattleInitiateResponse>, ApiError> {
    let match_id = req
        .match_id
        .ok_or_else(|| ApiError::BadRequest("relay setup call must carry match_id".to_string()))?;

    let local_player = if node.directory.get(&req.player_j2).await.is_some() {
        req.player_j2.clone()
    } else {
        req.player_j1.clone()
    };

    node.matches.write().await.insert(
        match_id.clone(),
        MatchEntry::Peer(PeerBattleInfo {
            match_id: match_id.clone(),
            host_url,
            local_player: local_player.clone(),
        }),
    );

    if let Some(entry) = node.directory.get(&local_player).await {
        node.bus
            .publish(
                &entry.reply_channel,
                ReplyEnvelope::new(ReplyKind::BattleStarted, json!({"matchId": match_id})),
            )
            .await;
    }

    Ok(Json(BattleInitiateResponse { match_id }))
}

pub async fn submit_move(
    State(node): State<Arc<Node>>,
    Json(req): Json<SubmitMoveRequest>,
) -> Result<StatusCode, ApiError> {
    let matches = node.matches.read().await;
    match matches.get(&req.match_id) {
        Some(MatchEntry::Host(handle)) => {
            handle.submit_move(req.player_id, req.card_id, req.damage).await?;
            Ok(StatusCode::OK)
        }
        Some(MatchEntry::Peer(info)) => {
            let url = format!("{}/battle/submit_move", info.host_url);
            let http = node.http.clone();
            drop(matches);
            forward_submit_move(&http, &url, req).await
        }
        None => Err(tcg_match::MatchError::MatchNotFound.into()),
    }
}

async fn forward_submit_move(
    http: &reqwest::Client,
    url: &str,
    req: SubmitMoveRequest,
) -> Result<StatusCode, ApiError> {
    match http.post(url).timeout(RELAY_TIMEOUT).json(&req).send().await {
        Ok(resp) if resp.status().is_success() => Ok(StatusCode::OK),
        Ok(resp) => Ok(StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)),
        Err(err) => Err(ApiError::Internal(format!("failed to relay move to host: {err}"))),
    }
}

pub async fn give_up(
    State(node): State<Arc<Node>>,
    Json(req): Json<GiveUpRequest>,
) -> Result<StatusCode, ApiError> {
    let matches = node.matches.read().await;
    match matches.get(&req.match_id) {
        Some(MatchEntry::Host(handle)) => {
            handle.give_up(req.player_id).await?;
            Ok(StatusCode::OK)
        }
        Some(MatchEntry::Peer(info)) => {
            let url = format!("{}/battle/give_up", info.host_url);
            let http = node.http.clone();
            drop(matches);
            let _ = http.post(&url).timeout(RELAY_TIMEOUT).json(&req).send().await;
            Ok(StatusCode::OK)
        }
        None => Err(tcg_match::MatchError::MatchNotFound.into()),
    }
}

/// `/battle/request_move` and `/battle/turn_result`: the host relays these
/// to whichever peer server holds the addressed player, carrying the same
/// payload shape the in-process notifier publishes locally.
pub async fn request_move(State(node): State<Arc<Node>>, Json(payload): Json<Value>) -> StatusCode {
    relay_to_local_player(&node, ReplyKind::YourTurn, payload).await
}

pub async fn turn_result(State(node): State<Arc<Node>>, Json(payload): Json<Value>) -> StatusCode {
    relay_to_local_player(&node, ReplyKind::TurnResult, payload).await
}

pub async fn end(State(node): State<Arc<Node>>, Json(payload): Json<Value>) -> StatusCode {
    let status = relay_to_local_player(&node, ReplyKind::BattleEnded, payload.clone()).await;

    if let Ok(req) = serde_json::from_value::<EndRelayRequest>(payload) {
        node.matches.write().await.remove(&req.match_id);
    }

    status
}

/// Resolves `matchId` out of `payload`, looks up the `Peer` record this
/// node holds for it, and publishes to the local player it names.
async fn relay_to_local_player(node: &Node, kind: ReplyKind, payload: Value) -> StatusCode {
    let Some(match_id) = payload.get("matchId").and_then(Value::as_str) else {
        return StatusCode::BAD_REQUEST;
    };

    let local_player = {
        let matches = node.matches.read().await;
        match matches.get(match_id) {
            Some(MatchEntry::Peer(info)) => Some(info.local_player.clone()),
            _ => None,
        }
    };

    let Some(player_id) = local_player else {
        return StatusCode::NOT_FOUND;
    };

    if let Some(entry) = node.directory.get(&player_id).await {
        node.bus.publish(&entry.reply_channel, ReplyEnvelope::new(kind, payload)).await;
    }

    StatusCode::OK
}
