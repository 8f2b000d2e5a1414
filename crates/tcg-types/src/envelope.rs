//! # Reply-Bus Envelope
//!
//! The single message shape published to a client's reply channel. Unlike an
//! inter-server IPC envelope this carries no routing metadata: the channel
//! name alone (held by [`crate::PlayerDirectoryEntry::reply_channel`])
//! addresses the recipient.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The known `tipo` values a client can receive on its reply channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyKind {
    #[serde(rename = "Compra_Sucesso")]
    PurchaseConfirmed,
    #[serde(rename = "Troca_Confirmada")]
    TradeConfirmed,
    #[serde(rename = "Rank_Update")]
    RankUpdate,
    #[serde(rename = "Inicio_Batalha")]
    BattleStarted,
    #[serde(rename = "Inicio_Troca")]
    TradeStarted,
    #[serde(rename = "Sua_Vez")]
    YourTurn,
    #[serde(rename = "Resultado_Turno")]
    TurnResult,
    #[serde(rename = "Fim_Batalha")]
    BattleEnded,
}

/// `{tipo, payload}` — the only message shape published to a reply channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub tipo: ReplyKind,
    pub payload: Value,
}

impl ReplyEnvelope {
    pub fn new(tipo: ReplyKind, payload: Value) -> Self {
        Self { tipo, payload }
    }
}
