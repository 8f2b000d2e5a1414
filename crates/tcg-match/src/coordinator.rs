use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tcg_types::ReplyKind;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::errors::MatchError;
use crate::notifier::{BattleResultSubmitter, MatchNotifier};
use crate::state::{MatchState, TurnPhase};

const INBOX_CAPACITY: usize = 16;
/// Default per-turn deadline, measured only on the host.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(15);

pub enum MatchCommand {
    SubmitMove {
        player_id: String,
        card_id: String,
        damage: i32,
        reply: oneshot::Sender<Result<(), MatchError>>,
    },
    GiveUp {
        player_id: String,
        reply: oneshot::Sender<Result<(), MatchError>>,
    },
}

/// A thin bookkeeping record kept on the node hosting J2 (the non-host side):
/// enough to relay moves to the authoritative host, nothing else.
#[derive(Debug, Clone)]
pub struct PeerBattleInfo {
    pub match_id: String,
    pub host_url: String,
    pub local_player: String,
}

/// The sender half clients (HTTP handlers) use to submit actions to the
/// running coordinator task.
#[derive(Clone)]
pub struct MatchHandle {
    pub match_id: String,
    sender: mpsc::Sender<MatchCommand>,
}

impl MatchHandle {
    pub async fn submit_move(&self, player_id: String, card_id: String, damage: i32) -> Result<(), MatchError> {
        let (reply, rx) = oneshot::channel();
        let _ = self
            .sender
            .send(MatchCommand::SubmitMove { player_id, card_id, damage, reply })
            .await;
        rx.await.unwrap_or(Err(MatchError::MatchNotFound))
    }

    pub async fn give_up(&self, player_id: String) -> Result<(), MatchError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.sender.send(MatchCommand::GiveUp { player_id, reply }).await;
        rx.await.unwrap_or(Err(MatchError::MatchNotFound))
    }
}

/// Spawns the host-only coordinator task for `state` and returns a handle
/// other tasks use to submit actions.
pub fn spawn(
    state: MatchState,
    notifier: Arc<dyn MatchNotifier>,
    submitter: Arc<dyn BattleResultSubmitter>,
    turn_timeout: Duration,
) -> MatchHandle {
    let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
    let match_id = state.id.clone();
    tokio::spawn(run(state, inbox, notifier, submitter, turn_timeout));
    MatchHandle { match_id, sender }
}

async fn run(
    mut state: MatchState,
    mut inbox: mpsc::Receiver<MatchCommand>,
    notifier: Arc<dyn MatchNotifier>,
    submitter: Arc<dyn BattleResultSubmitter>,
    turn_timeout: Duration,
) {
    notifier
        .notify(&state.player_j1, ReplyKind::BattleStarted, json!({"matchId": state.id}))
        .await;
    notifier
        .notify(&state.player_j2, ReplyKind::BattleStarted, json!({"matchId": state.id}))
        .await;

    info!(match_id = %state.id, "match coordinator started");

    while !state.is_finished() {
        tokio::select! {
            maybe_cmd = inbox.recv() => {
                match maybe_cmd {
                    Some(cmd) => handle_command(&mut state, cmd, &notifier, &submitter).await,
                    None => {
                        warn!(match_id = %state.id, "match inbox closed with no sender, abandoning");
                        return;
                    }
                }
            }
            _ = tokio::time::sleep(turn_timeout) => {
                handle_timeout(&mut state, &notifier, &submitter).await;
            }
        }
    }

    info!(match_id = %state.id, "match coordinator finished");
}

async fn handle_command(
    state: &mut MatchState,
    cmd: MatchCommand,
    notifier: &Arc<dyn MatchNotifier>,
    submitter: &Arc<dyn BattleResultSubmitter>,
) {
    match cmd {
        MatchCommand::SubmitMove { player_id, card_id, damage, reply } => {
            let result = apply_move(state, &player_id, &card_id, damage, notifier, submitter).await;
            let _ = reply.send(result);
        }
        MatchCommand::GiveUp { player_id, reply } => {
            let result = apply_give_up(state, &player_id, notifier, submitter).await;
            let _ = reply.send(result);
        }
    }
}

async fn apply_move(
    state: &mut MatchState,
    player_id: &str,
    card_id: &str,
    damage: i32,
    notifier: &Arc<dyn MatchNotifier>,
    submitter: &Arc<dyn BattleResultSubmitter>,
) -> Result<(), MatchError> {
    if player_id != state.turn {
        return Err(MatchError::InvalidTurn);
    }

    let hand = state.hand.get_mut(player_id).expect("every player has a hand entry");
    let card_index = hand.iter().position(|c| c == card_id).ok_or_else(|| MatchError::InvalidCard(card_id.to_string()))?;
    hand.remove(card_index);

    let opponent = state.other_player(player_id).to_string();
    let sanity = state.sanity.entry(opponent.clone()).or_insert(0);
    *sanity -= damage;

    state.phase = TurnPhase::ResolvingTurn;

    if state.sanity.get(&opponent).copied().unwrap_or(0) <= 0 {
        finish_match(state, player_id, notifier, submitter).await;
    } else {
        state.round += 1;
        state.turn = opponent.clone();
        state.phase = if state.is_j1_turn() {
            TurnPhase::AwaitingMoveJ1
        } else {
            TurnPhase::AwaitingMoveJ2
        };
        notifier
            .notify(&state.turn.clone(), ReplyKind::YourTurn, json!({"matchId": state.id, "round": state.round}))
            .await;
        let resolver = player_id.to_string();
        notifier
            .notify(&resolver, ReplyKind::TurnResult, json!({"matchId": state.id, "round": state.round}))
            .await;
    }

    Ok(())
}

async fn apply_give_up(
    state: &mut MatchState,
    player_id: &str,
    notifier: &Arc<dyn MatchNotifier>,
    submitter: &Arc<dyn BattleResultSubmitter>,
) -> Result<(), MatchError> {
    let winner = state.other_player(player_id).to_string();
    finish_match(state, &winner, notifier, submitter).await;
    Ok(())
}

async fn handle_timeout(
    state: &mut MatchState,
    notifier: &Arc<dyn MatchNotifier>,
    submitter: &Arc<dyn BattleResultSubmitter>,
) {
    let forfeiting_player = state.turn.clone();
    let winner = state.other_player(&forfeiting_player).to_string();
    warn!(match_id = %state.id, player = %forfeiting_player, "turn timed out, forfeiting");
    finish_match(state, &winner, notifier, submitter).await;
}

async fn finish_match(
    state: &mut MatchState,
    winner_id: &str,
    notifier: &Arc<dyn MatchNotifier>,
    submitter: &Arc<dyn BattleResultSubmitter>,
) {
    state.phase = TurnPhase::Finished;
    let loser = state.other_player(winner_id).to_string();

    notifier
        .notify(winner_id, ReplyKind::BattleEnded, json!({"matchId": state.id, "result": "victory"}))
        .await;
    notifier
        .notify(&loser, ReplyKind::BattleEnded, json!({"matchId": state.id, "result": "defeat"}))
        .await;

    submitter
        .submit_battle_result(&state.id, winner_id, &format!("round={}", state.round))
        .await;

    info!(match_id = %state.id, winner = %winner_id, "match finished");
}
