use lc_transfer::Transfer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{block::Block, blockchain::Blockchain, error::BlockchainError, peers::PeerSet};

/// A node's chain as served to clients and peers: the blocks plus the length
/// the node reports for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl ChainSnapshot {
    /// Whether the reported length matches the blocks actually delivered.
    pub fn is_consistent(&self) -> bool {
        self.length == self.chain.len()
    }
}

/// Everything a node knows: its chain, the transfers waiting for the next
/// block, and the peers it reconciles with.
///
/// The ledger does no locking of its own.  Callers that share it between
/// tasks must serialise every `&mut self` call.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    chain: Blockchain,
    pending: Vec<Transfer>,
    peers: PeerSet,
}

impl Ledger {
    /// A ledger holding only the genesis block.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(&self) -> &Blockchain {
        &self.chain
    }

    /// Transfers waiting for the next mined block, in submission order.
    pub fn pending(&self) -> &[Transfer] {
        &self.pending
    }

    pub fn peers(&self) -> &PeerSet {
        &self.peers
    }

    /// Queue a transfer for the next block.
    ///
    /// Returns the index the transfer is expected to land in.  Whichever block
    /// is mined next takes the whole buffer, so this is a hint only.
    pub fn submit_transfer(
        &mut self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
    ) -> u64 {
        self.push_transfer(Transfer::new(sender, receiver, amount))
    }

    /// Queue an already-built transfer.  See [`Ledger::submit_transfer`].
    pub fn push_transfer(&mut self, transfer: Transfer) -> u64 {
        self.pending.push(transfer);
        self.chain.tip().index + 1
    }

    /// Solve the puzzle against the tip and append a block carrying every
    /// pending transfer.  The pending buffer is empty afterwards.
    ///
    /// Blocks the calling thread for as long as the search takes.
    pub fn mine(&mut self) -> Result<Block, BlockchainError> {
        let block = self.chain.mine_block(self.pending.clone())?.clone();
        let count = std::mem::take(&mut self.pending).len();
        info!(
            index = block.index,
            nonce = block.nonce,
            transfers = count,
            "Mined block"
        );
        Ok(block)
    }

    /// Add a peer.  Full URLs are reduced to `host[:port]`; known peers are
    /// left alone.  Returns `true` if the peer is new.
    pub fn register_peer(&mut self, address: &str) -> Result<bool, BlockchainError> {
        let added = self.peers.insert(address)?;
        if added {
            debug!(peer = address, "Registered peer");
        }
        Ok(added)
    }

    /// The whole chain and its length.
    pub fn get_chain(&self) -> ChainSnapshot {
        ChainSnapshot {
            chain: self.chain.blocks().to_vec(),
            length: self.chain.len(),
        }
    }

    /// Validate the local chain.
    pub fn is_valid(&self) -> bool {
        self.chain.is_valid()
    }

    /// Validate an arbitrary block sequence without touching the ledger.
    pub fn validate(chain: &[Block]) -> bool {
        Blockchain::validate(chain)
    }

    /// Adopt `candidate` if it is valid and strictly longer than the local
    /// chain.
    ///
    /// Transfers still pending at that point were never mined into the new
    /// chain and are dropped.
    pub fn replace_chain(&mut self, candidate: Blockchain) -> bool {
        let new_length = candidate.len();
        if !self.chain.sync_from(candidate) {
            return false;
        }
        if !self.pending.is_empty() {
            warn!(
                dropped = self.pending.len(),
                "Discarding pending transfers after chain replacement"
            );
            self.pending.clear();
        }
        info!(new_length, "Replaced local chain");
        true
    }
}
