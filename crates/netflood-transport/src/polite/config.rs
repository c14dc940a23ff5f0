//! Polite broadcast configuration.

use serde::Deserialize;

use super::constants::MAX_DUPS;

/// Settings for a [`PoliteBroadcast`](super::PoliteBroadcast).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoliteConfig {
    /// Matching packets overheard before the pending packet is dropped.
    /// Zero disables suppression.
    pub max_dups: u8,
    /// Seed for the send-delay generator. Entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for PoliteConfig {
    fn default() -> Self {
        Self {
            max_dups: MAX_DUPS,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PoliteConfig::default();
        assert_eq!(cfg.max_dups, 2);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn test_deserialize() {
        let cfg: PoliteConfig = toml::from_str("seed = 7").unwrap();
        assert_eq!(cfg.max_dups, MAX_DUPS);
        assert_eq!(cfg.seed, Some(7));
    }
}
