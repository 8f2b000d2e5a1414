//! # tcg-bus
//!
//! The reply bus every client-facing notification flows through: purchase
//! confirmations, trade confirmations, rank updates, and live-match events.

mod errors;
mod reply_bus;

pub use errors::BusError;
pub use reply_bus::{InProcessReplyBus, ReplyBus, ReplySubscription};
