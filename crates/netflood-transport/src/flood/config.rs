//! Flood connection configuration.

use serde::Deserialize;

use netflood_core::constants::QUEUEBUF_NUM;
use netflood_core::types::Channel;

use super::constants::{DEFAULT_QUEUE_TIME, DEFAULT_RELAY_QUEUE_TIME, HOPS_MAX, PACKET_HISTORY_SIZE};
use crate::error::FloodError;

/// When a fresh received packet is written to the history cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryPolicy {
    /// Only packets that were actually relayed are recorded. A fresh packet
    /// that is declined, at the hop ceiling, or could not be relayed leaves
    /// the cache untouched, so a later copy of it is delivered again.
    #[default]
    RelayedOnly,
    /// Every fresh packet is recorded once it has been delivered.
    AllFresh,
}

/// Settings for one [`FloodConnection`](super::FloodConnection).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FloodConfig {
    /// Broadcast channel to bind.
    pub channel: u16,
    /// Queue time for originated packets, in seconds.
    pub queue_time: f64,
    /// Queue time for relayed packets, in seconds.
    pub relay_queue_time: f64,
    /// Packets received with this many hops or more are not relayed.
    pub hops_max: u8,
    /// Number of originators remembered.
    pub history_size: usize,
    pub history_policy: HistoryPolicy,
    /// Snapshot slots available for packets awaiting a relay decision.
    pub snapshot_pool_size: usize,
    /// Starting value of the local sequence counter.
    pub initial_seqno: u8,
}

impl FloodConfig {
    pub fn channel(&self) -> Channel {
        Channel(self.channel)
    }

    /// Reject settings the connection cannot run with.
    pub fn validate(&self) -> Result<(), FloodError> {
        if self.history_size == 0 {
            return Err(FloodError::Config(
                "history_size must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("queue_time", self.queue_time),
            ("relay_queue_time", self.relay_queue_time),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FloodError::Config(format!(
                    "{name} must be a non-negative number of seconds, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            channel: 0,
            queue_time: DEFAULT_QUEUE_TIME,
            relay_queue_time: DEFAULT_RELAY_QUEUE_TIME,
            hops_max: HOPS_MAX,
            history_size: PACKET_HISTORY_SIZE,
            history_policy: HistoryPolicy::default(),
            snapshot_pool_size: QUEUEBUF_NUM,
            initial_seqno: 0,
        }
    }
}
