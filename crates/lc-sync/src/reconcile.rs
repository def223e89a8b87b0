//! Longest-valid-chain reconciliation.
//!
//! A round polls every known peer, keeps the replies that are both valid and
//! longer than the local chain, and adopts the longest one.  A peer that
//! cannot be reached or answers with garbage is skipped for the round.

use futures::future::join_all;
use lc_blockchain::{Blockchain, ChainSnapshot, Ledger};
use tracing::{debug, info, warn};

use crate::{ChainSource, SyncError};

/// A valid chain offered by a peer.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub peer: String,
    pub chain: Blockchain,
}

/// Fetch every peer's chain concurrently and keep those that are valid and
/// strictly longer than `local_length`.  Candidates come back in the order
/// `peers` was given.
pub async fn fetch_candidates<S>(peers: &[String], source: &S, local_length: usize) -> Vec<Candidate>
where
    S: ChainSource + ?Sized,
{
    let replies = join_all(peers.iter().map(|peer| source.fetch_chain(peer))).await;

    peers
        .iter()
        .zip(replies)
        .filter_map(|(peer, reply)| match into_candidate(peer, reply, local_length) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!(%peer, "Skipping peer: {e}");
                None
            }
        })
        .collect()
}

fn into_candidate(
    peer: &str,
    reply: Result<ChainSnapshot, SyncError>,
    local_length: usize,
) -> Result<Option<Candidate>, SyncError> {
    let snapshot = reply?;
    if !snapshot.is_consistent() {
        return Err(SyncError::Malformed {
            peer: peer.to_string(),
            reason: format!(
                "reported length {} but sent {} blocks",
                snapshot.length,
                snapshot.chain.len()
            ),
        });
    }
    if snapshot.length <= local_length {
        debug!(%peer, length = snapshot.length, "Peer chain is not longer");
        return Ok(None);
    }
    match Blockchain::from_blocks(snapshot.chain) {
        Ok(chain) => Ok(Some(Candidate {
            peer: peer.to_string(),
            chain,
        })),
        Err(e) => {
            debug!(%peer, "Discarding invalid chain: {e}");
            Ok(None)
        }
    }
}

/// Pick the longest candidate that beats `local_length`.  On equal lengths the
/// earliest candidate wins.
pub fn select_longest(local_length: usize, candidates: Vec<Candidate>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut best_length = local_length;
    for candidate in candidates {
        if candidate.chain.len() > best_length {
            best_length = candidate.chain.len();
            best = Some(candidate);
        }
    }
    best
}

/// Run one reconciliation round against `ledger`'s peers.
///
/// Returns `true` if the local chain was replaced.  The ledger is borrowed
/// for the whole round; callers that must not hold their lock across network
/// calls can use [`fetch_candidates`] and [`select_longest`] directly.
pub async fn reconcile<S>(ledger: &mut Ledger, source: &S) -> bool
where
    S: ChainSource + ?Sized,
{
    let peers: Vec<String> = ledger.peers().iter().map(str::to_string).collect();
    let local_length = ledger.chain().len();
    let candidates = fetch_candidates(&peers, source, local_length).await;

    match select_longest(local_length, candidates) {
        Some(best) => {
            info!(peer = %best.peer, length = best.chain.len(), "Adopting peer chain");
            ledger.replace_chain(best.chain)
        }
        None => false,
    }
}
