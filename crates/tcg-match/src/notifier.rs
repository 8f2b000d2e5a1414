//! Client notification, abstracted over local delivery (reply bus) vs.
//! relay to the peer server hosting the other player — the coordinator
//! itself never decides which; it always just calls `notify`.

use async_trait::async_trait;
use serde_json::Value;
use tcg_types::ReplyKind;

#[async_trait]
pub trait MatchNotifier: Send + Sync {
    async fn notify(&self, player_id: &str, kind: ReplyKind, payload: Value);
}

/// Submits the host-signed `BattleResult` transaction once a match ends.
#[async_trait]
pub trait BattleResultSubmitter: Send + Sync {
    async fn submit_battle_result(&self, battle_id: &str, winner_id: &str, metadata: &str);
}
