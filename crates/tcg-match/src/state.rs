use std::collections::HashMap;

/// Sleep-state a player's dream can be in. The original card game's
/// definitions live outside this document's scope; this crate only tracks
/// the enum value a card effect can move a player through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DreamState {
    Sleepy,
    Awake,
    Nightmare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingMoveJ1,
    AwaitingMoveJ2,
    ResolvingTurn,
    Finished,
}

const STARTING_SANITY: i32 = 40;

/// Host-owned turn state for one battle. Lives only on the node hosting
/// J1; the peer node holds a thin [`crate::PeerBattleInfo`] record instead.
#[derive(Debug, Clone)]
pub struct MatchState {
    pub id: String,
    pub host_server_id: String,
    pub peer_server_id: String,
    pub player_j1: String,
    pub player_j2: String,
    pub turn: String,
    pub sanity: HashMap<String, i32>,
    pub dream_state: HashMap<String, DreamState>,
    pub hand: HashMap<String, Vec<String>>,
    pub round: u32,
    pub phase: TurnPhase,
}

impl MatchState {
    pub fn new(
        id: impl Into<String>,
        host_server_id: impl Into<String>,
        peer_server_id: impl Into<String>,
        player_j1: impl Into<String>,
        player_j2: impl Into<String>,
        hand_j1: Vec<String>,
        hand_j2: Vec<String>,
    ) -> Self {
        let player_j1 = player_j1.into();
        let player_j2 = player_j2.into();

        let sanity = HashMap::from([(player_j1.clone(), STARTING_SANITY), (player_j2.clone(), STARTING_SANITY)]);
        let dream_state = HashMap::from([
            (player_j1.clone(), DreamState::Sleepy),
            (player_j2.clone(), DreamState::Sleepy),
        ]);
        let hand = HashMap::from([(player_j1.clone(), hand_j1), (player_j2.clone(), hand_j2)]);

        Self {
            id: id.into(),
            host_server_id: host_server_id.into(),
            peer_server_id: peer_server_id.into(),
            turn: player_j1.clone(),
            player_j1,
            player_j2,
            sanity,
            dream_state,
            hand,
            round: 1,
            phase: TurnPhase::AwaitingMoveJ1,
        }
    }

    pub fn other_player(&self, player_id: &str) -> &str {
        if player_id == self.player_j1 {
            &self.player_j2
        } else {
            &self.player_j1
        }
    }

    pub fn is_j1_turn(&self) -> bool {
        self.turn == self.player_j1
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TurnPhase::Finished
    }
}
