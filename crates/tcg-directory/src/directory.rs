use std::collections::HashMap;
use std::sync::Arc;

use tcg_cluster::Cluster;
use tcg_types::PlayerDirectoryEntry;
use tokio::sync::RwLock;
use tracing::warn;

use crate::errors::DirectoryError;

/// The global player-to-host map. Only the leader accepts writes; it
/// replicates the full snapshot to every follower after each change.
/// Followers apply snapshots as received — last writer wins.
pub struct PlayerDirectory {
    cluster: Arc<Cluster>,
    peer_hosts: HashMap<String, String>,
    entries: RwLock<HashMap<String, PlayerDirectoryEntry>>,
    http: reqwest::Client,
}

impl PlayerDirectory {
    pub fn new(cluster: Arc<Cluster>, peer_hosts: HashMap<String, String>) -> Arc<Self> {
        Arc::new(Self {
            cluster,
            peer_hosts,
            entries: RwLock::new(HashMap::new()),
            http: reqwest::Client::new(),
        })
    }

    /// `POST /players/connect` semantics: rejects with `NotLeader` unless
    /// this node currently holds leadership, else updates the map and
    /// kicks off an asynchronous push to every follower.
    pub async fn connect(self: &Arc<Self>, entry: PlayerDirectoryEntry) -> Result<(), DirectoryError> {
        if !self.cluster.is_leader().await {
            return Err(DirectoryError::NotLeader);
        }

        self.entries
            .write()
            .await
            .insert(entry.player_id.clone(), entry);

        let this = Arc::clone(self);
        tokio::spawn(async move { this.push_to_followers().await });
        Ok(())
    }

    /// `POST /players/update` handler on a follower: replace the local
    /// replica wholesale with the leader's snapshot.
    pub async fn apply_snapshot(&self, snapshot: HashMap<String, PlayerDirectoryEntry>) {
        *self.entries.write().await = snapshot;
    }

    pub async fn get(&self, player_id: &str) -> Option<PlayerDirectoryEntry> {
        self.entries.read().await.get(player_id).cloned()
    }

    pub async fn snapshot(&self) -> HashMap<String, PlayerDirectoryEntry> {
        self.entries.read().await.clone()
    }

    async fn push_to_followers(&self) {
        let snapshot = self.snapshot().await;
        for (id, host) in &self.peer_hosts {
            if id == self.cluster.local_id() {
                continue;
            }
            let url = format!("http://{host}/players/update");
            if let Err(err) = self.http.post(&url).json(&snapshot).send().await {
                warn!(peer = %id, error = %err, "failed to push player directory snapshot");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn entry(player_id: &str) -> PlayerDirectoryEntry {
        PlayerDirectoryEntry {
            player_id: player_id.to_string(),
            server_id: "node-a".to_string(),
            server_host: "127.0.0.1:9000".to_string(),
            reply_channel: player_id.to_string(),
        }
    }

    #[tokio::test]
    async fn solo_node_is_leader_and_accepts_connect() {
        let mut server_list = HashMap::new();
        server_list.insert("solo".to_string(), "127.0.0.1:1".to_string());
        let cluster = Cluster::with_interval("solo".to_string(), server_list.clone(), Duration::from_secs(3600));
        cluster.probe_once().await;

        let directory = PlayerDirectory::new(cluster, server_list);
        directory.connect(entry("alice")).await.unwrap();
        assert!(directory.get("alice").await.is_some());
    }

    #[tokio::test]
    async fn non_leader_rejects_connect() {
        let mut server_list = HashMap::new();
        server_list.insert("node-a".to_string(), "127.0.0.1:1".to_string());
        server_list.insert("node-z".to_string(), "127.0.0.1:1".to_string());
        let cluster = Cluster::with_interval("node-z".to_string(), server_list.clone(), Duration::from_secs(3600));
        cluster.probe_once().await;
        assert!(!cluster.is_leader().await);

        let directory = PlayerDirectory::new(cluster, server_list);
        let err = directory.connect(entry("alice")).await.unwrap_err();
        assert_eq!(err, DirectoryError::NotLeader);
    }

    #[tokio::test]
    async fn apply_snapshot_replaces_local_map() {
        let mut server_list = HashMap::new();
        server_list.insert("solo".to_string(), "127.0.0.1:1".to_string());
        let cluster = Cluster::with_interval("solo".to_string(), server_list.clone(), Duration::from_secs(3600));
        cluster.probe_once().await;

        let directory = PlayerDirectory::new(cluster, server_list);
        let mut snapshot = HashMap::new();
        snapshot.insert("bob".to_string(), entry("bob"));
        directory.apply_snapshot(snapshot).await;

        assert!(directory.get("bob").await.is_some());
        assert!(directory.get("alice").await.is_none());
    }
}
