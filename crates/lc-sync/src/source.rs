use std::collections::HashMap;

use async_trait::async_trait;
use lc_blockchain::ChainSnapshot;
use tokio::sync::RwLock;

use crate::SyncError;

/// Somewhere peer chains can be fetched from.
///
/// The node's HTTP client is the production implementation; [`MemorySource`]
/// serves canned snapshots for tests and local simulations.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Fetch `peer`'s full chain and the length it reports.
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot, SyncError>;
}

/// A [`ChainSource`] answering from an in-memory table keyed by peer address.
/// Peers missing from the table are reported as unreachable.
#[derive(Debug, Default)]
pub struct MemorySource {
    chains: RwLock<HashMap<String, ChainSnapshot>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snapshot served for `peer`, replacing any previous one.
    pub async fn serve(&self, peer: impl Into<String>, snapshot: ChainSnapshot) {
        self.chains.write().await.insert(peer.into(), snapshot);
    }

    /// Make `peer` unreachable.
    pub async fn drop_peer(&self, peer: &str) {
        self.chains.write().await.remove(peer);
    }
}

#[async_trait]
impl ChainSource for MemorySource {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot, SyncError> {
        self.chains
            .read()
            .await
            .get(peer)
            .cloned()
            .ok_or_else(|| SyncError::Unreachable {
                peer: peer.to_string(),
                reason: "no such peer".into(),
            })
    }
}
