use std::time::Duration;

/// A transfer paid to the configured receiver every time this node mines.
#[derive(Debug, Clone, PartialEq)]
pub struct MinerReward {
    pub receiver: String,
    pub amount: f64,
}

/// Full configuration for a [`crate::Node`].
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Interface the HTTP server binds to.  Defaults to `0.0.0.0`.
    pub host: String,

    /// TCP port the HTTP server listens on.  Defaults to `5000`.
    pub port: u16,

    /// Peers registered at startup, as `host[:port]` or full URLs.
    pub peers: Vec<String>,

    /// Reward queued before each locally mined block.  `None` mines blocks
    /// carrying only submitted transfers.
    pub reward: Option<MinerReward>,

    /// Per-peer timeout for chain fetches during reconciliation.
    pub peer_timeout: Duration,

    /// If `Some`, reconcile with peers on this period in addition to explicit
    /// `/replace_chain` requests.
    pub reconcile_interval: Option<Duration>,

    /// When `true` the host binary should suppress log output.  The library
    /// itself does not initialise a tracing subscriber.
    pub quiet: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            peers: Vec::new(),
            reward: None,
            peer_timeout: Duration::from_secs(10),
            reconcile_interval: None,
            quiet: false,
        }
    }
}

impl NodeConfig {
    /// Default config on a specific port.
    pub fn on_port(port: u16) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Pay `amount` to `receiver` for every block this node mines.
    pub fn with_reward(mut self, receiver: impl Into<String>, amount: f64) -> Self {
        self.reward = Some(MinerReward {
            receiver: receiver.into(),
            amount,
        });
        self
    }

    /// `host:port` string for binding the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_port_5000() {
        let config = NodeConfig::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");
        assert!(config.reward.is_none());
        assert!(config.reconcile_interval.is_none());
    }

    #[test]
    fn builders_override_fields() {
        let config = NodeConfig::on_port(5001).with_reward("miner", 7.12);
        assert_eq!(config.port, 5001);
        assert_eq!(
            config.reward,
            Some(MinerReward {
                receiver: "miner".into(),
                amount: 7.12
            })
        );
    }
}
