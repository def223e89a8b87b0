use lc_transfer::Transfer;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{block::Block, error::BlockchainError, pow};

/// The append-only chain of [`Block`]s held by a node.
///
/// Invariants maintained by this type:
/// - Always contains at least the genesis block.
/// - Every block's `prev_hash` matches the hash of the preceding block.
/// - Every block's nonce solves the puzzle against the preceding nonce.
/// - Block indices are contiguous starting from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Block>", into = "Vec<Block>")]
pub struct Blockchain {
    blocks: Vec<Block>,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<Vec<Block>> for Blockchain {
    type Error = BlockchainError;

    fn try_from(blocks: Vec<Block>) -> Result<Self, Self::Error> {
        Self::from_blocks(blocks)
    }
}

impl From<Blockchain> for Vec<Block> {
    fn from(chain: Blockchain) -> Self {
        chain.blocks
    }
}

impl Blockchain {
    /// Initialise a new chain with only the genesis block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::genesis()],
        }
    }

    /// Adopt a block sequence received from elsewhere, rejecting it unless it
    /// passes [`Blockchain::check`].
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, BlockchainError> {
        Self::check(&blocks)?;
        Ok(Self { blocks })
    }

    /// Number of blocks in the chain (including genesis).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The most recent block.
    pub fn tip(&self) -> &Block {
        // Never empty: construction always goes through `new` or `check`.
        &self.blocks[self.blocks.len() - 1]
    }

    /// All blocks in the chain.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Solve the puzzle against the tip and append a block carrying
    /// `transfers`.
    ///
    /// Runs the unbounded puzzle search on the calling thread.
    pub fn mine_block(&mut self, transfers: Vec<Transfer>) -> Result<&Block, BlockchainError> {
        let tip = self.tip();
        let prev_hash = tip.hash()?;
        let index = tip.index + 1;
        let nonce = pow::solve(tip.nonce);
        self.blocks.push(Block::new(index, nonce, prev_hash, transfers));
        Ok(self.tip())
    }

    /// Validate the full chain.
    pub fn is_valid(&self) -> bool {
        Self::validate(&self.blocks)
    }

    /// Whether `blocks` forms a valid chain.  Never mutates its argument.
    pub fn validate(blocks: &[Block]) -> bool {
        match Self::check(blocks) {
            Ok(()) => true,
            Err(e) => {
                debug!("chain rejected: {e}");
                false
            }
        }
    }

    /// Validate `blocks`, naming the first violation found:
    /// - The first block is a genesis block.
    /// - Each block's `prev_hash` matches the hash of the previous block.
    /// - Each nonce solves the puzzle against the previous nonce.
    /// - Block indices are contiguous.
    pub fn check(blocks: &[Block]) -> Result<(), BlockchainError> {
        let first = blocks
            .first()
            .ok_or_else(|| BlockchainError::InvalidChain("chain is empty".into()))?;
        if !first.is_genesis() {
            return Err(BlockchainError::InvalidChain(
                "first block is not a genesis block".into(),
            ));
        }

        for window in blocks.windows(2) {
            let prev = &window[0];
            let next = &window[1];

            if next.prev_hash != prev.hash()? {
                return Err(BlockchainError::InvalidChain(format!(
                    "block {} does not link to its predecessor",
                    next.index
                )));
            }
            if !pow::verify(next.nonce, prev.nonce) {
                return Err(BlockchainError::InvalidChain(format!(
                    "block {} carries an invalid proof of work",
                    next.index
                )));
            }
            if prev.index.checked_add(1) != Some(next.index) {
                return Err(BlockchainError::InvalidChain(format!(
                    "block index {} does not follow {}",
                    next.index, prev.index
                )));
            }
        }

        Ok(())
    }

    /// Replace the local chain with `other` if `other` is longer and valid.
    ///
    /// This is the longest-chain rule used during reconciliation.
    pub fn sync_from(&mut self, other: Blockchain) -> bool {
        if other.len() > self.len() && other.is_valid() {
            *self = other;
            true
        } else {
            false
        }
    }
}
