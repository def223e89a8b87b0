use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::BlockchainError;

/// Network locations (`host[:port]`) of the other nodes this node polls
/// during reconciliation.
///
/// Entries are only ever added.  Iteration is in sorted order, so every
/// reconciliation round visits peers in the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerSet {
    peers: BTreeSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalise `address` and add it.  Returns `true` if the peer was not
    /// already known.
    pub fn insert(&mut self, address: &str) -> Result<bool, BlockchainError> {
        let peer = normalize(address)?;
        Ok(self.peers.insert(peer))
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.peers.iter().map(String::as_str)
    }
}

/// Reduce a peer address to its `host[:port]` authority.
///
/// Accepts either a bare authority (`127.0.0.1:5001`) or a full URL
/// (`http://127.0.0.1:5001/get_chain`); any scheme, credentials, path,
/// query and fragment are dropped.
pub fn normalize(address: &str) -> Result<String, BlockchainError> {
    let trimmed = address.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map_or(trimmed, |(_, rest)| rest);
    let authority = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, rest)| rest);

    if host_port.is_empty() || host_port.chars().any(char::is_whitespace) {
        return Err(BlockchainError::InvalidPeer(address.to_string()));
    }
    Ok(host_port.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_url_is_reduced_to_authority() {
        assert_eq!(
            normalize("http://127.0.0.1:5001/get_chain?x=1").unwrap(),
            "127.0.0.1:5001"
        );
        assert_eq!(
            normalize("https://user:pw@Node.Example:8443#frag").unwrap(),
            "node.example:8443"
        );
    }

    #[test]
    fn bare_authority_is_kept() {
        assert_eq!(normalize("127.0.0.1:5002").unwrap(), "127.0.0.1:5002");
        assert_eq!(normalize("  localhost  ").unwrap(), "localhost");
    }

    #[test]
    fn empty_addresses_are_rejected() {
        assert!(normalize("").is_err());
        assert!(normalize("http://").is_err());
        assert!(normalize("http:///path").is_err());
        assert!(normalize("bad host:1").is_err());
    }

    #[test]
    fn insert_is_idempotent() {
        let mut peers = PeerSet::new();
        assert!(peers.insert("http://127.0.0.1:5001").unwrap());
        assert!(!peers.insert("127.0.0.1:5001").unwrap());
        assert!(!peers.insert("http://127.0.0.1:5001/").unwrap());
        assert_eq!(peers.len(), 1);
        assert_eq!(peers.iter().collect::<Vec<_>>(), vec!["127.0.0.1:5001"]);
    }

    #[test]
    fn iteration_is_sorted() {
        let mut peers = PeerSet::new();
        for addr in ["c:1", "a:1", "b:1"] {
            peers.insert(addr).unwrap();
        }
        assert_eq!(peers.iter().collect::<Vec<_>>(), vec!["a:1", "b:1", "c:1"]);
    }
}
