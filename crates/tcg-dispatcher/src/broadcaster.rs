//! Outbound block broadcast, abstracted so the dispatcher never references
//! the cluster's peer list directly — breaks the Node -> Ledger ->
//! Dispatcher -> Node cycle the source's package-level globals created.

use async_trait::async_trait;
use tcg_types::Block;

#[async_trait]
pub trait BlockBroadcaster: Send + Sync {
    /// Send a newly mined block to every known peer. Best-effort: peer
    /// delivery failures are logged by the implementation, never surfaced
    /// here — a block that fails to reach a peer is caught up later via
    /// Nakamoto synchronization.
    async fn broadcast(&self, block: Block);
}
