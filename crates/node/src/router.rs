//! Builds the axum `Router` exposing every endpoint named for this node.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::Node;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn build(node: Arc<Node>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/blockchain/", get(handlers::get_blockchain))
        .route("/blockchain/mempool", get(handlers::get_mempool))
        .route("/blockchain/block", post(handlers::post_block))
        .route("/players/connect", post(handlers::connect))
        .route("/players/update", post(handlers::update))
        .route("/cards/buy", post(handlers::buy_card))
        .route("/battle/register", post(handlers::register_battle_result))
        .route("/trade/register", post(handlers::register_trade))
        .route("/battle/initiate", post(handlers::initiate))
        .route("/battle/request_move", post(handlers::request_move))
        .route("/battle/submit_move", post(handlers::submit_move))
        .route("/battle/turn_result", post(handlers::turn_result))
        .route("/battle/end", post(handlers::end))
        .route("/battle/give_up", post(handlers::give_up))
        .route("/trade/initiate", post(handlers::trade_initiate))
        .route("/trade/request_card", post(handlers::trade_request_card))
        .route("/trade/submit_card", post(handlers::trade_submit_card))
        .route("/trade/result", post(handlers::trade_result))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(TimeoutLayer::new(REQUEST_TIMEOUT)))
        .with_state(node)
}
