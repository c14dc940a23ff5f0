//! TOML-based configuration for netflood nodes.

use std::path::Path;

use serde::Deserialize;

use netflood_core::types::LinkAddress;
use netflood_interfaces::UdpConfig;
use netflood_transport::{FloodConfig, PoliteConfig};

use crate::error::NodeError;

/// Top-level node configuration loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct NodeConfig {
    #[serde(default)]
    pub node: NodeSection,
    #[serde(default)]
    pub flood: FloodConfig,
    #[serde(default)]
    pub polite: PoliteConfig,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub interfaces: InterfacesSection,
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("failed to read config file: {e}")))?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s)
            .map_err(|e| NodeError::Config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), NodeError> {
        self.node.link_address()?;
        self.flood.validate()?;
        if self.node.tick_ms == 0 {
            return Err(NodeError::Config("tick_ms must be at least 1".into()));
        }
        Ok(())
    }
}

/// The `[node]` section.
#[derive(Debug, Deserialize)]
pub struct NodeSection {
    /// Link address in `a.b` form. A random one is chosen when absent.
    pub address: Option<String>,
    /// Interval between polite transport polls, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Relay every fresh flood. When false the node only listens.
    #[serde(default = "default_relay")]
    pub relay: bool,
}

fn default_tick_ms() -> u64 {
    50
}

fn default_relay() -> bool {
    true
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            address: None,
            tick_ms: default_tick_ms(),
            relay: default_relay(),
        }
    }
}

impl NodeSection {
    /// The configured address, if any.
    pub fn link_address(&self) -> Result<Option<LinkAddress>, NodeError> {
        self.address
            .as_deref()
            .map(|s| {
                s.parse::<LinkAddress>()
                    .map_err(|e| NodeError::Config(e.to_string()))
            })
            .transpose()
    }
}

/// The `[logging]` section.
#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// The `[interfaces]` section containing arrays of interface configs.
#[derive(Debug, Default, Deserialize)]
pub struct InterfacesSection {
    #[serde(default)]
    pub udp: Vec<UdpConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use netflood_transport::HistoryPolicy;

    #[test]
    fn parse_minimal_config() {
        let config = NodeConfig::parse("").unwrap();
        assert_eq!(config.node.address, None);
        assert_eq!(config.node.tick_ms, 50);
        assert!(config.node.relay);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.flood, FloodConfig::default());
        assert_eq!(config.polite, PoliteConfig::default());
        assert!(config.interfaces.udp.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[node]
address = "12.34"
tick_ms = 20
relay = false

[flood]
channel = 129
relay_queue_time = 0.25
hops_max = 6
history_size = 16
history_policy = "all_fresh"

[polite]
max_dups = 3
seed = 99

[logging]
level = "debug"

[[interfaces.udp]]
name = "lan"
bind_addr = "0.0.0.0:4300"
target_addr = "255.255.255.255:4300"

[[interfaces.udp]]
name = "listen"
bind_addr = "0.0.0.0:4301"
broadcast = false
can_transmit = false
"#;
        let config = NodeConfig::parse(toml).unwrap();
        assert_eq!(
            config.node.link_address().unwrap(),
            Some(LinkAddress::new([12, 34]))
        );
        assert_eq!(config.node.tick_ms, 20);
        assert!(!config.node.relay);
        assert_eq!(config.flood.channel, 129);
        assert_eq!(config.flood.relay_queue_time, 0.25);
        assert_eq!(config.flood.queue_time, 0.0);
        assert_eq!(config.flood.hops_max, 6);
        assert_eq!(config.flood.history_size, 16);
        assert_eq!(config.flood.history_policy, HistoryPolicy::AllFresh);
        assert_eq!(config.polite.max_dups, 3);
        assert_eq!(config.polite.seed, Some(99));
        assert_eq!(config.logging.level, "debug");

        let udp = &config.interfaces.udp;
        assert_eq!(udp.len(), 2);
        assert_eq!(udp[0].name, "lan");
        assert!(udp[0].broadcast);
        assert_eq!(udp[0].target_addr, Some("255.255.255.255:4300".parse().unwrap()));
        assert!(!udp[1].can_transmit);
        assert!(udp[1].target_addr.is_none());
    }

    #[test]
    fn reject_bad_address() {
        let err = NodeConfig::parse("[node]\naddress = \"1.2.3\"\n").unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn reject_invalid_flood_settings() {
        let err = NodeConfig::parse("[flood]\nhistory_size = 0\n").unwrap_err();
        assert!(matches!(err, NodeError::Flood(_)));
    }

    #[test]
    fn reject_zero_tick() {
        assert!(NodeConfig::parse("[node]\ntick_ms = 0\n").is_err());
    }

    #[test]
    fn reject_unknown_history_policy() {
        let err = NodeConfig::parse("[flood]\nhistory_policy = \"sometimes\"\n").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[node]\naddress = \"3.4\"\n").unwrap();

        let config = NodeConfig::load(file.path()).unwrap();
        assert_eq!(config.node.address.as_deref(), Some("3.4"));
    }

    #[test]
    fn load_missing_file() {
        let err = NodeConfig::load(Path::new("/nonexistent/netflood.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
