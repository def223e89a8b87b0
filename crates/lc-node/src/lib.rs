pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod node;
pub mod protocol;

pub use api::build_router;
pub use client::HttpChainSource;
pub use config::{MinerReward, NodeConfig};
pub use error::NodeError;
pub use event::NodeEvent;
pub use node::Node;
