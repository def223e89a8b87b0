use std::net::SocketAddr;

use lc_blockchain::Block;
use lc_transfer::Transfer;

/// High-level events emitted by a running [`crate::Node`] that the host
/// binary can subscribe to via a channel.
#[derive(Debug, Clone)]
pub enum NodeEvent {
    /// The HTTP listener is bound.
    Listening(SocketAddr),

    /// A transfer was queued for the block with the given index.
    TransferSubmitted { transfer: Transfer, expected_index: u64 },

    /// A block was mined locally.
    BlockMined(Block),

    /// A previously unknown peer was registered.
    PeerRegistered(String),

    /// The local chain has been replaced by a longer peer chain.
    ChainReplaced { new_length: usize },
}
