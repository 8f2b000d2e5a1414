//! # tcg-trade
//!
//! Two-phase card-offer commit: one coordinator task per trade, torn down
//! silently on timeout if only one side ever offers.

mod coordinator;
mod errors;

pub use coordinator::{spawn, TradeHandle, TradeResultSubmitter, DEFAULT_TRADE_TIMEOUT};
pub use errors::TradeError;
