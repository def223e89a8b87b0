use std::time::Duration;

use clap::Parser;
use lc_node::{Node, NodeConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// linkchain node daemon.
#[derive(Parser, Debug)]
#[command(
    name = "lc-node",
    version,
    about = "linkchain proof-of-work ledger node",
    long_about = "Runs a linkchain node that mines blocks, accepts transfers \
                  over HTTP, and adopts the longest valid chain among its peers."
)]
struct Cli {
    /// Interface to bind the HTTP server to.
    #[arg(long, default_value = "0.0.0.0", env = "LC_HOST")]
    host: String,

    /// TCP port to listen on.
    #[arg(short, long, default_value_t = 5000, env = "LC_PORT")]
    port: u16,

    /// Peer to register at startup (repeatable), as host:port or a full URL.
    #[arg(long = "peer", env = "LC_PEERS", value_delimiter = ',')]
    peers: Vec<String>,

    /// Receiver of the reward paid for each locally mined block.
    #[arg(long, env = "LC_REWARD_RECEIVER")]
    reward_receiver: Option<String>,

    /// Amount of the mining reward.
    #[arg(long, default_value_t = 1.0, env = "LC_REWARD_AMOUNT")]
    reward_amount: f64,

    /// Seconds to wait for a peer's chain before skipping it.
    #[arg(long, default_value_t = 10, env = "LC_PEER_TIMEOUT")]
    peer_timeout: u64,

    /// Reconcile with peers every N seconds. Omit to reconcile only on request.
    #[arg(long, env = "LC_RECONCILE_INTERVAL")]
    reconcile_interval: Option<u64>,

    /// Suppress log output to stderr (run silently).
    #[arg(short, long, default_value_t = false, env = "LC_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::from_default_env().add_directive("lc_node=info".parse()?)
    };
    tracing_subscriber::fmt().with_env_filter(log_filter).init();

    let mut config = NodeConfig {
        host: cli.host,
        port: cli.port,
        peers: cli.peers,
        peer_timeout: Duration::from_secs(cli.peer_timeout),
        reconcile_interval: cli.reconcile_interval.map(Duration::from_secs),
        quiet: cli.quiet,
        ..NodeConfig::default()
    };
    if let Some(receiver) = cli.reward_receiver {
        anyhow::ensure!(
            cli.reward_amount.is_finite(),
            "reward amount must be a finite number"
        );
        config = config.with_reward(receiver, cli.reward_amount);
    }

    info!(
        listen = %config.listen_addr(),
        peers = config.peers.len(),
        reconcile_interval_secs = cli.reconcile_interval,
        "Starting linkchain node"
    );

    let listener = TcpListener::bind(config.listen_addr()).await?;
    let (node, mut events) = Node::new(config)?;

    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            info!("NodeEvent: {event:?}");
        }
    });

    if let Some(interval) = node.config().reconcile_interval {
        tokio::spawn(node.clone().run_periodic_reconcile(interval));
    }

    node.serve(listener).await?;

    Ok(())
}
