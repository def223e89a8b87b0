pub mod block;
pub mod blockchain;
pub mod error;
pub mod hash;
pub mod ledger;
pub mod peers;
pub mod pow;

pub use block::Block;
pub use blockchain::Blockchain;
pub use error::BlockchainError;
pub use ledger::{ChainSnapshot, Ledger};
pub use peers::PeerSet;

/// Number of leading `'0'` hex characters a puzzle digest must start with.
pub const DIFFICULTY: usize = 4;

/// `prev_hash` carried by the genesis block.
pub const GENESIS_PREV_HASH: &str = "0";

/// Nonce carried by the genesis block.
pub const GENESIS_NONCE: u64 = 1;
