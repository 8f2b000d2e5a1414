//! Player directory endpoints: leader-only connect, and the leader's
//! fan-out snapshot push that every follower applies wholesale.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::dto::{ConnectRequest, UpdateRequest};
use crate::errors::ApiError;
use crate::state::Node;

pub async fn connect(
    State(node): State<Arc<Node>>,
    Json(entry): Json<ConnectRequest>,
) -> Result<StatusCode, ApiError> {
    node.directory.connect(entry).await?;
    Ok(StatusCode::OK)
}

pub async fn update(State(node): State<Arc<Node>>, Json(snapshot): Json<UpdateRequest>) -> StatusCode {
    node.directory.apply_snapshot(snapshot).await;
    StatusCode::OK
}
