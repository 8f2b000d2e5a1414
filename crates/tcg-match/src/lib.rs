//! # tcg-match
//!
//! One actor task per battle, running exclusively on the host server
//! (the node hosting J1). Reachable only through its bounded inbox.

mod coordinator;
mod errors;
mod notifier;
mod state;

pub use coordinator::{spawn, MatchCommand, MatchHandle, PeerBattleInfo, DEFAULT_TURN_TIMEOUT};
pub use errors::MatchError;
pub use notifier::{BattleResultSubmitter, MatchNotifier};
pub use state::{DreamState, MatchState, TurnPhase};
