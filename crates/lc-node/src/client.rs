use std::time::Duration;

use async_trait::async_trait;
use lc_blockchain::ChainSnapshot;
use lc_sync::{ChainSource, SyncError};
use reqwest::Client;

use crate::{protocol::GET_CHAIN, NodeError};

/// Fetches peer chains from other nodes' `GET /get_chain` route.
#[derive(Debug, Clone)]
pub struct HttpChainSource {
    client: Client,
}

impl HttpChainSource {
    /// Build a client whose requests give up after `timeout`.  Peers are
    /// always contacted directly, never through a system proxy.
    pub fn new(timeout: Duration) -> Result<Self, NodeError> {
        let client = Client::builder().timeout(timeout).no_proxy().build()?;
        Ok(Self { client })
    }

    fn chain_url(peer: &str) -> String {
        format!("http://{peer}{GET_CHAIN}")
    }
}

#[async_trait]
impl ChainSource for HttpChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainSnapshot, SyncError> {
        let response = self
            .client
            .get(Self::chain_url(peer))
            .send()
            .await
            .map_err(|e| SyncError::Unreachable {
                peer: peer.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                peer: peer.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<ChainSnapshot>()
            .await
            .map_err(|e| SyncError::Malformed {
                peer: peer.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_url_targets_get_chain() {
        assert_eq!(
            HttpChainSource::chain_url("127.0.0.1:5001"),
            "http://127.0.0.1:5001/get_chain"
        );
    }

    #[tokio::test]
    async fn unreachable_peer_is_reported() {
        let source = HttpChainSource::new(Duration::from_millis(500)).unwrap();
        // Port 9 on localhost is not expected to host a linkchain node.
        let err = source.fetch_chain("127.0.0.1:9").await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Unreachable { .. } | SyncError::Status { .. } | SyncError::Malformed { .. }
        ));
    }
}
