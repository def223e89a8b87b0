//! JSON bodies exchanged over the node's HTTP interface.
//!
//! `GET /get_chain` answers with [`lc_blockchain::ChainSnapshot`] directly so
//! that peers fetching it during reconciliation decode exactly what this node
//! serves.

use lc_blockchain::Block;
use serde::{Deserialize, Serialize};

/// Route paths, shared by the router and the peer client.
pub const MINE_BLOCK: &str = "/mine_block";
pub const GET_CHAIN: &str = "/get_chain";
pub const IS_VALID: &str = "/is_valid";
pub const ADD_TRANSACTION: &str = "/add_transaction";
pub const CONNECT_NODE: &str = "/connect_node";
pub const REPLACE_CHAIN: &str = "/replace_chain";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MineResponse {
    pub message: String,
    #[serde(flatten)]
    pub block: Block,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidityResponse {
    pub message: String,
    pub is_chain_valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTransactionResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectNodeRequest {
    #[serde(default)]
    pub nodes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectNodeResponse {
    pub message: String,
    pub all_nodes: Vec<String>,
    pub total_nodes: usize,
}

/// Result of `GET /replace_chain`.  Exactly one of `new_chain` (the chain was
/// replaced) and `actual_chain` (the local chain was kept) is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceChainResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_chain: Option<Vec<Block>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_chain: Option<Vec<Block>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
