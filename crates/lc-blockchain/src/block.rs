use chrono::Utc;
use lc_transfer::Transfer;
use serde::{Deserialize, Serialize};

use crate::{hash, BlockchainError, GENESIS_NONCE, GENESIS_PREV_HASH};

/// A single block in the ledger.
///
/// Blocks are created by the ledger when a puzzle solution is accepted and are
/// never modified afterwards.  Each one commits to its predecessor through
/// `prev_hash` and to the predecessor's nonce through the puzzle solved by
/// `nonce`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (genesis = 1).
    pub index: u64,

    /// Creation time, `YYYY-MM-DD HH:MM:SS.ffffff` in UTC.
    pub timestamp: String,

    /// Puzzle solution against the previous block's nonce.
    pub nonce: u64,

    /// Hex digest of the previous block.  `"0"` for the genesis block.
    pub prev_hash: String,

    /// Transfers absorbed from the pending buffer, in submission order.
    pub transfers: Vec<Transfer>,
}

impl Block {
    /// Build a block stamped with the current time.
    pub fn new(index: u64, nonce: u64, prev_hash: String, transfers: Vec<Transfer>) -> Self {
        Self {
            index,
            timestamp: now(),
            nonce,
            prev_hash,
            transfers,
        }
    }

    /// The first block of every chain.
    pub fn genesis() -> Self {
        Self::new(1, GENESIS_NONCE, GENESIS_PREV_HASH.to_string(), Vec::new())
    }

    /// Whether this block has the fixed shape of a genesis block: index 1,
    /// the genesis nonce and `prev_hash`, and no transfers.  The timestamp
    /// differs per node and is not checked.
    pub fn is_genesis(&self) -> bool {
        self.index == 1
            && self.nonce == GENESIS_NONCE
            && self.prev_hash == GENESIS_PREV_HASH
            && self.transfers.is_empty()
    }

    /// Canonical hex digest over every field of the block.
    pub fn hash(&self) -> Result<String, BlockchainError> {
        hash::digest(self)
    }
}

fn now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}
