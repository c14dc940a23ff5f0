//! Single-slot polite broadcast scheduler.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use netflood_core::types::Channel;

use super::config::PoliteConfig;
use crate::error::TransportError;
use crate::transport::{SendQuality, Transport};

/// Work for the caller produced by [`PoliteBroadcast::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoliteAction {
    /// Put these bytes on the air now.
    Transmit(Vec<u8>),
    /// The pending packet was abandoned after enough duplicates were heard.
    Dropped,
}

#[derive(Debug, Clone)]
struct Pending {
    packet: Vec<u8>,
    deadline: f64,
    quality: SendQuality,
    dups: u8,
}

impl Pending {
    /// Whether `heard` is the same packet as far as the sender asked us to
    /// look: equal length and matching leading `quality` bytes.
    fn matches(&self, heard: &[u8]) -> bool {
        if heard.len() != self.packet.len() {
            return false;
        }
        let n = self.quality.prefix_len().min(heard.len());
        heard[..n] == self.packet[..n]
    }
}

/// Polite broadcast transport.
///
/// Holds at most one packet. A new send replaces whatever is pending. A
/// packet sent with queue time `q > 0` waits a random delay in `[q/2, q)`
/// and is abandoned if `max_dups` matching packets are overheard first.
pub struct PoliteBroadcast {
    config: PoliteConfig,
    channel: Option<Channel>,
    pending: Option<Pending>,
    events: Vec<PoliteAction>,
    now: f64,
    rng: StdRng,
}

impl PoliteBroadcast {
    pub fn new(config: PoliteConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            channel: None,
            pending: None,
            events: Vec::new(),
            now: 0.0,
            rng,
        }
    }

    /// Deterministic scheduler for tests and simulations.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(PoliteConfig {
            seed: Some(seed),
            ..PoliteConfig::default()
        })
    }

    /// Move the clock forward. Time never runs backwards.
    pub fn advance(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Advance to `now` and collect due work.
    pub fn poll(&mut self, now: f64) -> Vec<PoliteAction> {
        self.advance(now);
        let mut actions = std::mem::take(&mut self.events);

        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.deadline <= self.now)
        {
            if let Some(pending) = self.pending.take() {
                trace!(len = pending.packet.len(), "polite transmit");
                actions.push(PoliteAction::Transmit(pending.packet));
            }
        }

        actions
    }

    /// Report a packet heard on the channel.
    ///
    /// Returns true when it duplicated the pending packet.
    pub fn overheard(&mut self, packet: &[u8]) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        if !pending.matches(packet) {
            return false;
        }

        pending.dups = pending.dups.saturating_add(1);
        trace!(dups = pending.dups, "overheard duplicate of pending packet");

        if self.config.max_dups > 0 && pending.dups >= self.config.max_dups {
            debug!(
                dups = pending.dups,
                "dropping pending packet, neighbors already sent it"
            );
            self.pending = None;
            self.events.push(PoliteAction::Dropped);
        }
        true
    }

    /// Time the pending packet becomes due, if any.
    pub fn next_deadline(&self) -> Option<f64> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Duplicates counted against the pending packet.
    pub fn pending_dups(&self) -> Option<u8> {
        self.pending.as_ref().map(|p| p.dups)
    }

    pub fn channel(&self) -> Option<Channel> {
        self.channel
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    fn delay(&mut self, queue_time: f64) -> f64 {
        let half = queue_time / 2.0;
        if half > 0.0 {
            half + self.rng.gen_range(0.0..half)
        } else {
            0.0
        }
    }
}

impl Transport for PoliteBroadcast {
    fn open(&mut self, channel: Channel) -> Result<(), TransportError> {
        if let Some(open) = self.channel {
            return Err(TransportError::AlreadyOpen(open.0));
        }
        self.channel = Some(channel);
        debug!(%channel, "polite broadcast opened");
        Ok(())
    }

    fn send(
        &mut self,
        packet: &[u8],
        queue_time: f64,
        quality: SendQuality,
    ) -> Result<(), TransportError> {
        if self.channel.is_none() {
            return Err(TransportError::NotOpen);
        }
        if !queue_time.is_finite() || queue_time < 0.0 {
            return Err(TransportError::Rejected(format!(
                "invalid queue time {queue_time}"
            )));
        }

        if self.pending.is_some() {
            debug!("replacing pending polite packet");
        }
        let deadline = self.now + self.delay(queue_time);
        self.pending = Some(Pending {
            packet: packet.to_vec(),
            deadline,
            quality,
            dups: 0,
        });
        Ok(())
    }

    fn cancel(&mut self) {
        if self.pending.take().is_some() {
            debug!("pending polite packet cancelled");
        }
    }

    fn close(&mut self) {
        self.pending = None;
        self.events.clear();
        if let Some(channel) = self.channel.take() {
            debug!(%channel, "polite broadcast closed");
        }
    }
}
