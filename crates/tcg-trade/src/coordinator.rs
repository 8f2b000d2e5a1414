use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::errors::TradeError;

const INBOX_CAPACITY: usize = 8;
/// Default time a trade may sit with only one side offered before the
/// coordinator tears it down without submitting anything.
pub const DEFAULT_TRADE_TIMEOUT: Duration = Duration::from_secs(30);

/// Submits the two-party Trade transaction once both offers are in.
#[async_trait]
pub trait TradeResultSubmitter: Send + Sync {
    async fn submit_trade(&self, trade_id: &str, player_a: &str, player_b: &str, card_a: &str, card_b: &str);
}

struct TradeState {
    id: String,
    player_a: String,
    player_b: String,
    offer_a: Option<String>,
    offer_b: Option<String>,
}

impl TradeState {
    fn offer(&mut self, player_id: &str, card_id: String) -> Result<(), TradeError> {
        if player_id == self.player_a {
            if self.offer_a.is_some() {
                return Err(TradeError::AlreadyOffered(player_id.to_string()));
            }
            self.offer_a = Some(card_id);
        } else if player_id == self.player_b {
            if self.offer_b.is_some() {
                return Err(TradeError::AlreadyOffered(player_id.to_string()));
            }
            self.offer_b = Some(card_id);
        } else {
            return Err(TradeError::UnknownPlayer(player_id.to_string()));
        }
        Ok(())
    }

    fn both_offered(&self) -> Option<(String, String)> {
        match (&self.offer_a, &self.offer_b) {
            (Some(a), Some(b)) => Some((a.clone(), b.clone())),
            _ => None,
        }
    }
}

enum TradeCommand {
    OfferCard {
        player_id: String,
        card_id: String,
        reply: oneshot::Sender<Result<(), TradeError>>,
    },
}

#[derive(Clone)]
pub struct TradeHandle {
    pub trade_id: String,
    sender: mpsc::Sender<TradeCommand>,
}

impl TradeHandle {
    pub async fn offer_card(&self, player_id: String, card_id: String) -> Result<(), TradeError> {
        let (reply, rx) = oneshot::channel();
        let _ = self
            .sender
            .send(TradeCommand::OfferCard { player_id, card_id, reply })
            .await;
        rx.await.unwrap_or(Err(TradeError::TradeNotFound))
    }
}

pub fn spawn(
    trade_id: impl Into<String>,
    player_a: impl Into<String>,
    player_b: impl Into<String>,
    submitter: Arc<dyn TradeResultSubmitter>,
    timeout: Duration,
) -> TradeHandle {
    let trade_id = trade_id.into();
    let state = TradeState {
        id: trade_id.clone(),
        player_a: player_a.into(),
        player_b: player_b.into(),
        offer_a: None,
        offer_b: None,
    };
    let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
    tokio::spawn(run(state, inbox, submitter, timeout));
    TradeHandle { trade_id, sender }
}

async fn run(
    mut state: TradeState,
    mut inbox: mpsc::Receiver<TradeCommand>,
    submitter: Arc<dyn TradeResultSubmitter>,
    timeout: Duration,
) {
    loop {
        tokio::select! {
            maybe_cmd = inbox.recv() => {
                let Some(TradeCommand::OfferCard { player_id, card_id, reply }) = maybe_cmd else {
                    warn!(trade_id = %state.id, "trade inbox closed, abandoning");
                    return;
                };
                let result = state.offer(&player_id, card_id);
                let _ = reply.send(result);

                if let Some((card_a, card_b)) = state.both_offered() {
                    submitter
                        .submit_trade(&state.id, &state.player_a, &state.player_b, &card_a, &card_b)
                        .await;
                    info!(trade_id = %state.id, "trade completed, both offers received");
                    return;
                }
            }
            _ = tokio::time::sleep(timeout) => {
                warn!(trade_id = %state.id, "trade timed out with only one side offered, abandoning silently");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Duration as StdDuration;

    #[derive(Default)]
    struct RecordingSubmitter {
        submissions: AtomicUsize,
    }

    #[async_trait]
    impl TradeResultSubmitter for RecordingSubmitter {
        async fn submit_trade(&self, _trade_id: &str, _a: &str, _b: &str, _ca: &str, _cb: &str) {
            self.submissions.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn both_offers_complete_the_trade() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let handle = spawn("trade-1", "alice", "bob", submitter.clone(), StdDuration::from_secs(5));

        handle.offer_card("alice".to_string(), "card-a".to_string()).await.unwrap();
        handle.offer_card("bob".to_string(), "card-b".to_string()).await.unwrap();

        tokio::time::sleep(StdDuration::from_millis(50)).await;
        assert_eq!(submitter.submissions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_player_rejected() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let handle = spawn("trade-1", "alice", "bob", submitter, StdDuration::from_secs(5));

        let err = handle.offer_card("mallory".to_string(), "card-x".to_string()).await.unwrap_err();
        assert_eq!(err, TradeError::UnknownPlayer("mallory".to_string()));
    }

    #[tokio::test]
    async fn double_offer_from_same_player_rejected() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let handle = spawn("trade-1", "alice", "bob", submitter, StdDuration::from_secs(5));

        handle.offer_card("alice".to_string(), "card-a".to_string()).await.unwrap();
        let err = handle.offer_card("alice".to_string(), "card-a2".to_string()).await.unwrap_err();
        assert_eq!(err, TradeError::AlreadyOffered("alice".to_string()));
    }

    #[tokio::test]
    async fn timeout_abandons_without_submitting() {
        let submitter = Arc::new(RecordingSubmitter::default());
        let handle = spawn("trade-1", "alice", "bob", submitter.clone(), StdDuration::from_millis(30));

        handle.offer_card("alice".to_string(), "card-a".to_string()).await.unwrap();
        tokio::time::sleep(StdDuration::from_millis(100)).await;
        assert_eq!(submitter.submissions.load(Ordering::SeqCst), 0);
    }
}
