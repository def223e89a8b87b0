//! HTTP routes exposing a [`Node`].
//!
//! The handlers only translate between JSON and `Node` calls.  The one check
//! made here rather than in the ledger is that transfer requests carry all
//! three fields.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use lc_blockchain::ChainSnapshot;
use lc_transfer::{PartialTransfer, TransferError};
use tracing::info;

use crate::{
    protocol::{
        AddTransactionResponse, ConnectNodeRequest, ConnectNodeResponse, ErrorResponse,
        MineResponse, ReplaceChainResponse, ValidityResponse, ADD_TRANSACTION, CONNECT_NODE,
        GET_CHAIN, IS_VALID, MINE_BLOCK, REPLACE_CHAIN,
    },
    Node, NodeError,
};

#[derive(Debug)]
pub enum ApiError {
    /// The request body is missing something the route needs.
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<NodeError> for ApiError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::Blockchain(e) => ApiError::BadRequest(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::MissingField(_) => ApiError::BadRequest(format!(
                "Some critical keys of the transaction are missing: {err}"
            )),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

/// Build the router serving every node route.
pub fn build_router(node: Node) -> Router {
    Router::new()
        .route(MINE_BLOCK, get(mine_block))
        .route(GET_CHAIN, get(get_chain))
        .route(IS_VALID, get(is_valid))
        .route(ADD_TRANSACTION, post(add_transaction))
        .route(CONNECT_NODE, post(connect_node))
        .route(REPLACE_CHAIN, get(replace_chain))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(node)
}

async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "HTTP request"
    );
    response
}

async fn mine_block(State(node): State<Node>) -> Result<Json<MineResponse>, ApiError> {
    let block = node.mine().await?;
    Ok(Json(MineResponse {
        message: format!("Mined block #{}", block.index),
        block,
    }))
}

async fn get_chain(State(node): State<Node>) -> Json<ChainSnapshot> {
    Json(node.get_chain().await)
}

async fn is_valid(State(node): State<Node>) -> Json<ValidityResponse> {
    let is_chain_valid = node.is_valid().await;
    let message = if is_chain_valid {
        "The blockchain is valid"
    } else {
        "The blockchain is invalid"
    };
    Json(ValidityResponse {
        message: message.to_string(),
        is_chain_valid,
    })
}

async fn add_transaction(
    State(node): State<Node>,
    Json(request): Json<PartialTransfer>,
) -> Result<(StatusCode, Json<AddTransactionResponse>), ApiError> {
    let transfer = request.complete()?;
    let index = node.submit_transfer(transfer).await;
    Ok((
        StatusCode::CREATED,
        Json(AddTransactionResponse {
            message: format!("This transaction will be added to block #{index}"),
            index,
        }),
    ))
}

async fn connect_node(
    State(node): State<Node>,
    Json(request): Json<ConnectNodeRequest>,
) -> Result<(StatusCode, Json<ConnectNodeResponse>), ApiError> {
    let Some(nodes) = request.nodes else {
        return Err(ApiError::BadRequest("No node".to_string()));
    };
    let all_nodes = node.register_peers(&nodes).await?;
    Ok((
        StatusCode::CREATED,
        Json(ConnectNodeResponse {
            message: "All nodes connected. The network now contains:".to_string(),
            total_nodes: all_nodes.len(),
            all_nodes,
        }),
    ))
}

async fn replace_chain(State(node): State<Node>) -> Json<ReplaceChainResponse> {
    let replaced = node.reconcile().await;
    let chain = node.get_chain().await.chain;
    let response = if replaced {
        ReplaceChainResponse {
            message: "The chain was replaced by the longest valid peer chain".to_string(),
            new_chain: Some(chain),
            actual_chain: None,
        }
    } else {
        ReplaceChainResponse {
            message: "All good. The chain is the longest one".to_string(),
            new_chain: None,
            actual_chain: Some(chain),
        }
    };
    Json(response)
}
