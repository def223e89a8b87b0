/// End-to-end tests wiring all crates together behind the HTTP routes.
///
/// Route tests drive the real router through `axum-test`.  The peer tests bind
/// actual localhost listeners so that reconciliation goes through the same
/// HTTP client a deployed node uses.
use std::{sync::Arc, time::Duration};

use axum_test::TestServer;
use lc_blockchain::{Block, ChainSnapshot, Ledger};
use lc_node::{
    build_router,
    protocol::{
        AddTransactionResponse, ConnectNodeResponse, MineResponse, ReplaceChainResponse,
        ValidityResponse,
    },
    Node, NodeConfig,
};
use lc_sync::MemorySource;
use lc_transfer::Transfer;
use serde_json::json;
use tokio::net::TcpListener;

fn server_with_source(config: NodeConfig) -> (TestServer, Node, Arc<MemorySource>) {
    let source = Arc::new(MemorySource::new());
    let (node, _events) = Node::with_source(config, source.clone()).unwrap();
    let server = TestServer::new(build_router(node.clone())).unwrap();
    (server, node, source)
}

fn server() -> TestServer {
    server_with_source(NodeConfig::default()).0
}

async fn spawn_http_node(config: NodeConfig) -> (Node, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (node, _events) = Node::new(config).unwrap();
    tokio::spawn(node.clone().serve(listener));
    (node, addr)
}

// ── Routes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_node_serves_genesis_only() {
    let server = server();

    let response = server.get("/get_chain").await;
    assert_eq!(response.status_code(), 200);
    let snapshot: ChainSnapshot = response.json();
    assert_eq!(snapshot.length, 1);
    assert!(snapshot.chain[0].is_genesis());

    let validity: ValidityResponse = server.get("/is_valid").await.json();
    assert!(validity.is_chain_valid);
}

#[tokio::test]
async fn transfer_then_mine_scenario() {
    let server = server();
    let genesis = server.get("/get_chain").await.json::<ChainSnapshot>().chain[0].clone();

    let response = server
        .post("/add_transaction")
        .json(&json!({"sender": "X", "receiver": "Y", "amount": 10}))
        .await;
    assert_eq!(response.status_code(), 201);
    let added: AddTransactionResponse = response.json();
    assert_eq!(added.index, 2);

    let response = server.get("/mine_block").await;
    assert_eq!(response.status_code(), 200);
    let mined: MineResponse = response.json();
    assert_eq!(mined.block.index, 2);
    assert_eq!(mined.block.transfers, vec![Transfer::new("X", "Y", 10.0)]);
    assert_eq!(mined.block.prev_hash, genesis.hash().unwrap());

    let validity: ValidityResponse = server.get("/is_valid").await.json();
    assert!(validity.is_chain_valid);

    let snapshot: ChainSnapshot = server.get("/get_chain").await.json();
    assert_eq!(snapshot.length, 2);
    assert_eq!(snapshot.chain[1], mined.block);
}

#[tokio::test]
async fn mine_response_flattens_block_fields() {
    let server = server();
    let body: serde_json::Value = server.get("/mine_block").await.json();
    assert!(body["message"].is_string());
    assert_eq!(body["index"], 2);
    assert!(body["nonce"].is_u64());
    assert!(body["prev_hash"].is_string());
    assert!(body["transfers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn add_transaction_missing_field_is_rejected() {
    let (server, node, _) = server_with_source(NodeConfig::default());

    let response = server
        .post("/add_transaction")
        .json(&json!({"sender": "X", "amount": 10}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("receiver"));
    assert!(node.pending().await.is_empty());
}

#[tokio::test]
async fn connect_node_registers_normalised_peers() {
    let server = server();

    let response = server
        .post("/connect_node")
        .json(&json!({"nodes": [
            "http://127.0.0.1:5001",
            "http://127.0.0.1:5002/",
            "127.0.0.1:5001"
        ]}))
        .await;

    assert_eq!(response.status_code(), 201);
    let body: ConnectNodeResponse = response.json();
    assert_eq!(body.total_nodes, 2);
    assert_eq!(body.all_nodes, vec!["127.0.0.1:5001", "127.0.0.1:5002"]);
}

#[tokio::test]
async fn connect_node_without_nodes_is_rejected() {
    let server = server();
    let response = server.post("/connect_node").json(&json!({})).await;
    assert_eq!(response.status_code(), 400);

    let response = server
        .post("/connect_node")
        .json(&json!({"nodes": ["http://"]}))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn replace_chain_adopts_longer_peer_chain() {
    let (server, _node, source) = server_with_source(NodeConfig::default());

    let mut remote = Ledger::new();
    for _ in 0..3 {
        remote.mine().unwrap();
    }
    source.serve("peer:1", remote.get_chain()).await;
    server
        .post("/connect_node")
        .json(&json!({"nodes": ["http://peer:1"]}))
        .await;

    let body: ReplaceChainResponse = server.get("/replace_chain").await.json();
    assert_eq!(body.new_chain.as_deref(), Some(remote.get_chain().chain.as_slice()));
    assert!(body.actual_chain.is_none());

    let snapshot: ChainSnapshot = server.get("/get_chain").await.json();
    assert_eq!(snapshot, remote.get_chain());
}

#[tokio::test]
async fn replace_chain_keeps_longest_local_chain() {
    let (server, node, source) = server_with_source(NodeConfig::default());
    node.mine().await.unwrap();

    source.serve("peer:1", Ledger::new().get_chain()).await;
    node.register_peers(&["peer:1".to_string()]).await.unwrap();

    let body: ReplaceChainResponse = server.get("/replace_chain").await.json();
    assert!(body.new_chain.is_none());
    let kept: Vec<Block> = body.actual_chain.unwrap();
    assert_eq!(kept.len(), 2);
}

// ── Real HTTP peers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn nodes_converge_over_http() {
    let (miner, miner_addr) = spawn_http_node(NodeConfig::default()).await;
    miner.submit_transfer(Transfer::new("X", "Y", 10.0)).await;
    miner.mine().await.unwrap();
    miner.mine().await.unwrap();

    let follower_config = NodeConfig {
        peers: vec![format!("http://{miner_addr}")],
        peer_timeout: Duration::from_secs(5),
        ..NodeConfig::default()
    };
    let (follower, _) = spawn_http_node(follower_config).await;

    assert!(follower.reconcile().await);
    assert_eq!(follower.get_chain().await, miner.get_chain().await);
    assert!(follower.is_valid().await);

    // A second round finds nothing longer.
    assert!(!follower.reconcile().await);
}

#[tokio::test]
async fn unreachable_http_peer_is_skipped() {
    let config = NodeConfig {
        peers: vec!["127.0.0.1:9".to_string()],
        peer_timeout: Duration::from_millis(500),
        ..NodeConfig::default()
    };
    let (node, _) = spawn_http_node(config).await;
    node.mine().await.unwrap();

    assert!(!node.reconcile().await);
    assert_eq!(node.get_chain().await.length, 2);
}
