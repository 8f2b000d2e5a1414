//! Shared fixtures for the scenario tests: an in-process node plus a helper
//! to build client-signed transaction bodies with a byte-identical canonical
//! encoding to what `tcg_signature::oracle` verifies.

use std::collections::HashMap;
use std::time::Duration;

use node::config::NodeConfig;
use node::router;
use node::state::Node;
use serde_json::{json, Value};
use tcg_crypto::{sha256, P256KeyPair};

/// Low enough that mining completes inside a test timeout; production uses
/// `tcg_ledger::pow::DEFAULT_TARGET_BITS`.
const TEST_TARGET_BITS: u32 = 8;

/// Boots a solo-cluster node on an ephemeral port and returns its base URL
/// plus a client to drive it with.
pub(crate) async fn spawn_test_node() -> (String, reqwest::Client) {
    let mut server_list = HashMap::new();
    server_list.insert("node-1".to_string(), "127.0.0.1:1".to_string());
    let config = NodeConfig {
        server_id: "node-1".to_string(),
        api_port: 0,
        server_list,
        target_bits: TEST_TARGET_BITS,
        health_check_interval: Duration::from_secs(3600),
        turn_timeout: Duration::from_secs(15),
        trade_timeout: Duration::from_secs(30),
    };

    let node = Node::bootstrap(config);
    tokio::spawn(node.dispatcher.clone().run_mine_loop());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router::build(node)).await.unwrap();
    });

    (format!("http://{addr}"), reqwest::Client::new())
}

/// Builds a signed `TransactionRequest` JSON body. `id` is caller-chosen so
/// tests can resubmit the exact same body to exercise mempool dedup.
pub(crate) fn signed_transaction(
    keypair: &P256KeyPair,
    id: &str,
    tx_type: &str,
    data: Vec<&str>,
    user_id: &str,
) -> Value {
    let payload = "{}".to_string();
    let timestamp = "1700000000".to_string();
    let user_data = vec![payload, timestamp, user_id.to_string(), tx_type.to_string()];
    let digest = sha256(&serde_json::to_vec(&user_data).unwrap());
    let signature = keypair.sign(&digest).to_r_s_bytes();

    json!({
        "id": id,
        "type": tx_type,
        "data": data,
        "user_data": user_data,
        "public_key": keypair.public_key().to_sec1_bytes(),
        "signature": signature,
    })
}

/// Polls `GET /blockchain/` until height reaches at least `min_height` or
/// the poll budget is exhausted.
pub(crate) async fn wait_for_height(base: &str, http: &reqwest::Client, min_height: u64) -> bool {
    for _ in 0..50 {
        let chain: Value = http.get(format!("{base}/blockchain/")).send().await.unwrap().json().await.unwrap();
        if chain["height"].as_u64().unwrap() >= min_height {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}
