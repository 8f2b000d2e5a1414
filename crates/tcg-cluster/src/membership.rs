use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{DEFAULT_HEALTH_CHECK_INTERVAL, HEALTH_PROBE_TIMEOUT};

/// Membership and leadership state for one node's view of the cluster.
/// Each node maintains its own view independently; there is no quorum
/// commit, so partitions elect independently — an accepted limitation.
pub struct Cluster {
    local_id: String,
    server_list: HashMap<String, String>,
    live: RwLock<HashMap<String, bool>>,
    leader: RwLock<Option<String>>,
    http: reqwest::Client,
    health_check_interval: Duration,
}

impl Cluster {
    pub fn new(local_id: String, server_list: HashMap<String, String>) -> Arc<Self> {
        Self::with_interval(local_id, server_list, DEFAULT_HEALTH_CHECK_INTERVAL)
    }

    pub fn with_interval(
        local_id: String,
        server_list: HashMap<String, String>,
        health_check_interval: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            local_id,
            server_list,
            live: RwLock::new(HashMap::new()),
            leader: RwLock::new(None),
            http: reqwest::Client::new(),
            health_check_interval,
        })
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    pub async fn is_leader(&self) -> bool {
        self.leader.read().await.as_deref() == Some(self.local_id.as_str())
    }

    pub async fn leader(&self) -> Option<String> {
        self.leader.read().await.clone()
    }

    pub async fn is_alive(&self, id: &str) -> bool {
        self.live.read().await.get(id).copied().unwrap_or(false)
    }

    pub async fn live_ids(&self) -> Vec<String> {
        let live = self.live.read().await;
        let mut ids: Vec<String> = live
            .iter()
            .filter(|(_, alive)| **alive)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Runs the health-check sweep forever at `health_check_interval`.
    pub async fn run_health_check_loop(self: Arc<Self>) {
        loop {
            self.probe_once().await;
            tokio::time::sleep(self.health_check_interval).await;
        }
    }

    /// One fan-out sweep: probes every peer concurrently, marks self
    /// always alive, and re-elects if the current leader is missing.
    pub async fn probe_once(&self) {
        let mut probes = Vec::new();
        for (id, host) in &self.server_list {
            if id == &self.local_id {
                continue;
            }
            let id = id.clone();
            let host = host.clone();
            let http = self.http.clone();
            probes.push(async move {
                let alive = probe_host(&http, &host).await;
                (id, alive)
            });
        }

        let results = futures::future::join_all(probes).await;

        let mut live_now: HashMap<String, bool> = results.into_iter().collect();
        live_now.insert(self.local_id.clone(), true);

        *self.live.write().await = live_now.clone();

        let current_leader = self.leader.read().await.clone();
        let leader_missing = match &current_leader {
            Some(id) => !live_now.get(id).copied().unwrap_or(false),
            None => true,
        };

        if leader_missing {
            self.elect(&live_now).await;
        }
    }

    async fn elect(&self, live_now: &HashMap<String, bool>) {
        let mut live_ids: Vec<&String> = live_now
            .iter()
            .filter(|(_, alive)| **alive)
            .map(|(id, _)| id)
            .collect();
        live_ids.sort();

        let new_leader = live_ids
            .first()
            .map(|id| (*id).clone())
            .unwrap_or_else(|| self.local_id.clone());

        let mut leader = self.leader.write().await;
        let changed = leader.as_deref() != Some(new_leader.as_str());
        *leader = Some(new_leader.clone());
        drop(leader);

        if changed {
            info!(leader = %new_leader, candidates = ?live_ids, "new leader elected");
        }
    }
}

async fn probe_host(http: &reqwest::Client, host: &str) -> bool {
    let url = format!("http://{host}/health");
    match http.get(&url).timeout(HEALTH_PROBE_TIMEOUT).send().await {
        Ok(response) => response.status().is_success(),
        Err(err) => {
            warn!(host, error = %err, "health probe failed");
            false
        }
    }
}
