use std::{sync::Arc, time::Duration};

use lc_blockchain::{peers::normalize, Block, ChainSnapshot, Ledger};
use lc_sync::{fetch_candidates, select_longest, ChainSource};
use lc_transfer::Transfer;
use tokio::{
    net::TcpListener,
    sync::{mpsc, Mutex},
    time,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    api::build_router, client::HttpChainSource, config::NodeConfig, error::NodeError,
    event::NodeEvent,
};

/// A linkchain node: one [`Ledger`] plus the means to reach its peers.
///
/// `Node` is a cheap handle; clones share the same ledger.  Every mutation
/// takes the ledger lock, so at most one of mining, transfer submission and
/// chain replacement is in flight at a time.
#[derive(Clone)]
pub struct Node {
    ledger: Arc<Mutex<Ledger>>,
    source: Arc<dyn ChainSource>,
    address: String,
    config: Arc<NodeConfig>,
    event_tx: mpsc::UnboundedSender<NodeEvent>,
}

impl Node {
    /// Create a node that fetches peer chains over HTTP.
    ///
    /// Returns the node together with a receiver for [`NodeEvent`]s that the
    /// calling application can process independently.
    pub fn new(config: NodeConfig) -> Result<(Self, mpsc::UnboundedReceiver<NodeEvent>), NodeError> {
        let source = HttpChainSource::new(config.peer_timeout)?;
        Self::with_source(config, Arc::new(source))
    }

    /// Create a node that fetches peer chains from `source`.
    pub fn with_source(
        config: NodeConfig,
        source: Arc<dyn ChainSource>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<NodeEvent>), NodeError> {
        let mut ledger = Ledger::new();
        for peer in &config.peers {
            ledger.register_peer(peer)?;
        }

        let address = Uuid::new_v4().simple().to_string();
        info!(%address, "Node address");

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let node = Self {
            ledger: Arc::new(Mutex::new(ledger)),
            source,
            address,
            config: Arc::new(config),
            event_tx,
        };
        Ok((node, event_rx))
    }

    /// This node's identifier, used as the sender of miner rewards.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Queue the configured reward (if any), then mine a block.
    ///
    /// The puzzle search runs on the blocking thread pool while the ledger
    /// lock is held, so concurrent callers wait for the tip to move instead of
    /// solving against the same one.
    pub async fn mine(&self) -> Result<Block, NodeError> {
        let mut ledger = Arc::clone(&self.ledger).lock_owned().await;
        if let Some(reward) = &self.config.reward {
            ledger.submit_transfer(self.address.clone(), reward.receiver.clone(), reward.amount);
        }

        let block = tokio::task::spawn_blocking(move || ledger.mine()).await??;
        let _ = self.event_tx.send(NodeEvent::BlockMined(block.clone()));
        Ok(block)
    }

    /// The whole chain and its length.
    pub async fn get_chain(&self) -> ChainSnapshot {
        self.ledger.lock().await.get_chain()
    }

    pub async fn is_valid(&self) -> bool {
        self.ledger.lock().await.is_valid()
    }

    /// Transfers not yet mined into a block.
    pub async fn pending(&self) -> Vec<Transfer> {
        self.ledger.lock().await.pending().to_vec()
    }

    /// Queue `transfer` for the next block and return the index it is
    /// expected to land in.
    pub async fn submit_transfer(&self, transfer: Transfer) -> u64 {
        let expected_index = self.ledger.lock().await.push_transfer(transfer.clone());
        debug!(expected_index, "Queued transfer");
        let _ = self.event_tx.send(NodeEvent::TransferSubmitted {
            transfer,
            expected_index,
        });
        expected_index
    }

    /// Register every address in `addresses`.  Nothing is registered unless
    /// all of them are valid.  Returns the full peer list afterwards.
    pub async fn register_peers(&self, addresses: &[String]) -> Result<Vec<String>, NodeError> {
        let normalized = addresses
            .iter()
            .map(|addr| normalize(addr))
            .collect::<Result<Vec<_>, _>>()?;

        let mut ledger = self.ledger.lock().await;
        for peer in normalized {
            if ledger.register_peer(&peer)? {
                info!(%peer, "Connected peer");
                let _ = self.event_tx.send(NodeEvent::PeerRegistered(peer));
            }
        }
        Ok(ledger.peers().iter().map(str::to_string).collect())
    }

    pub async fn peers(&self) -> Vec<String> {
        self.ledger
            .lock()
            .await
            .peers()
            .iter()
            .map(str::to_string)
            .collect()
    }

    /// Run one reconciliation round.  Returns `true` if the local chain was
    /// replaced by a longer valid peer chain.
    ///
    /// Peers are polled without holding the ledger lock; the lock is taken
    /// again only to compare against the current length and swap the chain.
    pub async fn reconcile(&self) -> bool {
        let (peers, local_length) = {
            let ledger = self.ledger.lock().await;
            let peers: Vec<String> = ledger.peers().iter().map(str::to_string).collect();
            (peers, ledger.chain().len())
        };
        debug!(peers = peers.len(), local_length, "Reconciling");

        let candidates = fetch_candidates(&peers, self.source.as_ref(), local_length).await;

        let mut ledger = self.ledger.lock().await;
        let Some(best) = select_longest(ledger.chain().len(), candidates) else {
            return false;
        };
        info!(peer = %best.peer, length = best.chain.len(), "Adopting peer chain");
        if !ledger.replace_chain(best.chain) {
            return false;
        }
        let new_length = ledger.chain().len();
        let _ = self.event_tx.send(NodeEvent::ChainReplaced { new_length });
        true
    }

    /// Serve the HTTP interface on `listener` until the server stops.
    pub async fn serve(self, listener: TcpListener) -> Result<(), NodeError> {
        let local_addr = listener.local_addr()?;
        info!("Listening on {local_addr}");
        let _ = self.event_tx.send(NodeEvent::Listening(local_addr));

        axum::serve(listener, build_router(self)).await?;
        Ok(())
    }

    /// Reconcile with peers every `interval`, forever.
    pub async fn run_periodic_reconcile(self, interval: Duration) {
        let mut ticker = time::interval(interval);
        // Skip ticks that fire while a slow round is still running.
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
        // Consume the first (immediate) tick so the first round runs after
        // `interval`.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.reconcile().await;
        }
    }
}
