//! The single serialization point between the local miner and incoming
//! network blocks, per the consistency guarantee: at any instant exactly
//! one of {idle, mining, validating-remote} is the local state.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tcg_ledger::Ledger;
use tcg_mempool::Mempool;
use tcg_types::Block;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::broadcaster::BlockBroadcaster;
use crate::errors::DispatcherError;
use crate::state::DispatcherState;

const SNAPSHOT_LIMIT: usize = 50;
const IDLE_POLL: Duration = Duration::from_millis(200);

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before epoch")
        .as_secs()
}

pub struct Dispatcher<B: BlockBroadcaster> {
    ledger: Arc<Mutex<Ledger>>,
    mempool: Arc<Mutex<Mempool>>,
    miner_cancel: Mutex<Option<watch::Sender<bool>>>,
    state: Mutex<DispatcherState>,
    broadcaster: Arc<B>,
}

impl<B: BlockBroadcaster + 'static> Dispatcher<B> {
    pub fn new(ledger: Arc<Mutex<Ledger>>, mempool: Arc<Mutex<Mempool>>, broadcaster: Arc<B>) -> Arc<Self> {
        Arc::new(Self {
            ledger,
            mempool,
            miner_cancel: Mutex::new(None),
            state: Mutex::new(DispatcherState::Idle),
            broadcaster,
        })
    }

    pub async fn state(&self) -> DispatcherState {
        *self.state.lock().await
    }

    /// Handle a block arriving over the network: cancel any in-flight
    /// mining round, then validate and append.
    pub async fn handle_incoming_block(&self, block: Block) -> Result<(), DispatcherError> {
        self.cancel_mining().await;
        *self.state.lock().await = DispatcherState::ValidatingRemote;

        let result = self.ledger.lock().await.append(block.clone());

        *self.state.lock().await = DispatcherState::Idle;
        match result {
            Ok(()) => {
                self.prune_mempool(&block).await;
                info!(nonce = block.nonce, "appended block received from peer");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "rejected incoming block");
                Err(err.into())
            }
        }
    }

    async fn cancel_mining(&self) {
        if let Some(tx) = self.miner_cancel.lock().await.take() {
            let _ = tx.send(true);
        }
    }

    async fn prune_mempool(&self, block: &Block) {
        let ids: Vec<String> = block.transactions.iter().map(|tx| tx.id.clone()).collect();
        self.mempool
            .lock()
            .await
            .remove(ids.iter().map(String::as_str));
    }

    /// Dedicated long-running task: after each append (local or remote) it
    /// polls `mempool.len()`; when nonzero it snapshots and mines.
    pub async fn run_mine_loop(self: Arc<Self>) {
        loop {
            let mempool_len = self.mempool.lock().await.len();
            if mempool_len == 0 {
                tokio::time::sleep(IDLE_POLL).await;
                continue;
            }
            self.mine_once().await;
        }
    }

    async fn mine_once(&self) {
        let txs = self.mempool.lock().await.snapshot(SNAPSHOT_LIMIT);
        if txs.is_empty() {
            return;
        }

        let (previous_hash, target_bits) = {
            let ledger = self.ledger.lock().await;
            (ledger.last_hash(), ledger.target_bits())
        };

        let (cancel_tx, cancel_rx) = watch::channel(false);
        *self.miner_cancel.lock().await = Some(cancel_tx);
        *self.state.lock().await = DispatcherState::Mining;

        let timestamp = now_secs();
        let outcome = tcg_miner::mine(
            previous_hash.clone(),
            txs.clone(),
            timestamp,
            target_bits,
            cancel_rx,
        )
        .await;

        *self.miner_cancel.lock().await = None;
        *self.state.lock().await = DispatcherState::Idle;

        match outcome {
            Ok((nonce, hash)) => {
                let block = Block {
                    timestamp,
                    previous_hash,
                    transactions: txs,
                    nonce,
                    hash: hash.to_vec(),
                };
                match self.ledger.lock().await.append(block.clone()) {
                    Ok(()) => {
                        self.prune_mempool(&block).await;
                        info!(nonce, "mined and appended local block");
                        self.broadcaster.broadcast(block).await;
                    }
                    Err(err) => warn!(error = %err, "locally mined block failed append"),
                }
            }
            Err(_cancelled) => {
                debug!("mining round cancelled, re-polling mempool");
            }
        }
    }
}
