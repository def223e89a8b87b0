use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("peer {peer} unreachable: {reason}")]
    Unreachable { peer: String, reason: String },

    #[error("peer {peer} answered with status {status}")]
    Status { peer: String, status: u16 },

    #[error("peer {peer} sent a malformed chain: {reason}")]
    Malformed { peer: String, reason: String },
}
