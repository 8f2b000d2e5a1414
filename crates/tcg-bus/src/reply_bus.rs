//! # Reply Bus
//!
//! The out-of-band channel clients subscribe to for transaction confirmation
//! and live-match notifications. Production deployments point this at an
//! external pub/sub broker (the connection string is opaque to this crate,
//! per the abstract "client reply bus" named in scope); [`InProcessReplyBus`]
//! is the broadcast-backed implementation this node and its tests use.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tcg_types::ReplyEnvelope;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use crate::errors::BusError;

const CHANNEL_CAPACITY: usize = 256;

/// Publishing side of the reply bus: one `publish` call per confirmation or
/// live-match notification, addressed by the player's opaque channel name.
#[async_trait]
pub trait ReplyBus: Send + Sync {
    /// Publish `envelope` to `channel`. Returns the number of live
    /// subscribers that received it — zero means the player is not
    /// currently listening (e.g. disconnected), which is not an error.
    async fn publish(&self, channel: &str, envelope: ReplyEnvelope) -> usize;
}

/// A subscription handle bound to one channel name.
pub struct ReplySubscription {
    channel: String,
    receiver: broadcast::Receiver<ReplyEnvelope>,
}

impl ReplySubscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Await the next envelope published to this channel.
    pub async fn recv(&mut self) -> Result<ReplyEnvelope, BusError> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) => return Ok(envelope),
                Err(broadcast::error::RecvError::Closed) => return Err(BusError::Closed),
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, channel = %self.channel, "reply subscriber lagged");
                    continue;
                }
            }
        }
    }
}

/// In-process broadcast implementation of [`ReplyBus`]. Each channel name
/// gets its own broadcast pair, created lazily on first subscribe; a
/// `publish` to a channel with no subscribers is a no-op, matching an
/// external broker's at-most-once, no-durability semantics.
pub struct InProcessReplyBus {
    channels: Mutex<HashMap<String, broadcast::Sender<ReplyEnvelope>>>,
}

impl InProcessReplyBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            channels: Mutex::new(HashMap::new()),
        })
    }

    /// Subscribe to `channel`, creating its broadcast pair if this is the
    /// first subscriber.
    pub async fn subscribe(&self, channel: &str) -> ReplySubscription {
        let mut channels = self.channels.lock().await;
        let sender = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone();
        ReplySubscription {
            channel: channel.to_string(),
            receiver: sender.subscribe(),
        }
    }
}

#[async_trait]
impl ReplyBus for InProcessReplyBus {
    async fn publish(&self, channel: &str, envelope: ReplyEnvelope) -> usize {
        let mut channels = self.channels.lock().await;
        let sender = channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        match sender.send(envelope) {
            Ok(receivers) => {
                debug!(channel, receivers, "reply published");
                receivers
            }
            Err(_) => {
                warn!(channel, "reply dropped, no subscribers");
                0
            }
        }
    }
}
