//! The single `Node` struct: every subsystem's state, behind `Arc`, wired
//! together once at startup. Handlers and background loops both reach
//! through this rather than threading a dozen separate parameters.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tcg_bus::{InProcessReplyBus, ReplyBus};
use tcg_cluster::Cluster;
use tcg_directory::PlayerDirectory;
use tcg_dispatcher::Dispatcher;
use tcg_ledger::Ledger;
use tcg_listener::BlockListener;
use tcg_match::{MatchHandle, PeerBattleInfo};
use tcg_mempool::Mempool;
use tcg_trade::TradeHandle;
use tokio::sync::{Mutex, RwLock};

use crate::broadcaster::NodeBroadcaster;
use crate::config::NodeConfig;
use crate::identity::NodeIdentity;

/// Which side of a battle this node's in-memory record represents: the
/// authoritative host coordinator, or a thin relay record for a player
/// connected here while the match itself runs elsewhere.
pub enum MatchEntry {
    Host(MatchHandle),
    Peer(PeerBattleInfo),
}

/// A trade's counterpart to `MatchEntry`.
pub enum TradeEntry {
    Host(TradeHandle),
    Peer(PeerTradeInfo),
}

#[derive(Debug, Clone)]
pub struct PeerTradeInfo {
    pub trade_id: String,
    pub host_url: String,
    pub local_player: String,
}

pub struct Node {
    pub config: NodeConfig,
    pub identity: Arc<NodeIdentity>,
    pub ledger: Arc<Mutex<Ledger>>,
    pub mempool: Arc<Mutex<Mempool>>,
    pub cluster: Arc<Cluster>,
    pub directory: Arc<PlayerDirectory>,
    pub dispatcher: Arc<Dispatcher<NodeBroadcaster>>,
    pub bus: Arc<InProcessReplyBus>,
    pub listener: BlockListener,
    pub http: reqwest::Client,
    pub matches: RwLock<HashMap<String, MatchEntry>>,
    pub trades: RwLock<HashMap<String, TradeEntry>>,
}

impl Node {
    pub fn bootstrap(config: NodeConfig) -> Arc<Node> {
        let ledger = Arc::new(Mutex::new(Ledger::genesis(config.target_bits)));
        let mempool = Arc::new(Mutex::new(Mempool::new()));
        let cluster = Cluster::with_interval(
            config.server_id.clone(),
            config.server_list.clone(),
            config.health_check_interval,
        );
        let directory = PlayerDirectory::new(cluster.clone(), config.server_list.clone());
        let broadcaster = NodeBroadcaster::new(config.server_id.clone(), config.server_list.clone());
        let dispatcher = Dispatcher::new(ledger.clone(), mempool.clone(), Arc::new(broadcaster));
        let bus = InProcessReplyBus::new();
        let identity = Arc::new(NodeIdentity::generate());
        let listener = BlockListener::new(config.server_id.clone(), directory.clone(), bus.clone() as Arc<dyn ReplyBus>);

        Arc::new(Node {
            config,
            identity,
            ledger,
            mempool,
            cluster,
            directory,
            dispatcher,
            bus,
            listener,
            http: reqwest::Client::new(),
            matches: RwLock::new(HashMap::new()),
            trades: RwLock::new(HashMap::new()),
        })
    }

    pub fn reply_bus(&self) -> Arc<dyn ReplyBus> {
        self.bus.clone()
    }

    pub fn turn_timeout(&self) -> Duration {
        self.config.turn_timeout
    }

    pub fn trade_timeout(&self) -> Duration {
        self.config.trade_timeout
    }

    /// This node's own externally reachable `host:port`, as peers would
    /// dial it. Looked up from its own entry in the server list rather
    /// than kept as a separate field, so there is exactly one source of
    /// truth for every node's address.
    pub fn local_host(&self) -> &str {
        self.config
            .local_host()
            .expect("server_id always names an entry in its own server_list")
    }
}
