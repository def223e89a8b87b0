use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("blockchain error: {0}")]
    Blockchain(#[from] lc_blockchain::BlockchainError),

    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("mining task failed: {0}")]
    MiningTask(#[from] tokio::task::JoinError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
