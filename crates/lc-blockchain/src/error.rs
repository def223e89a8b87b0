use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockchainError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid chain: {0}")]
    InvalidChain(String),

    #[error("invalid peer address: {0:?}")]
    InvalidPeer(String),
}
