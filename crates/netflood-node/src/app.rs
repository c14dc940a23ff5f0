//! Application callbacks for the node's flood connection.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use netflood_core::packet::buf::PacketBuf;
use netflood_core::types::Channel;
use netflood_transport::{Delivery, FloodCallbacks};

/// A flood payload delivered to this node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredMessage {
    pub delivery: Delivery,
    pub payload: Vec<u8>,
}

/// Logs every delivery, optionally forwards it to a subscriber, and asks for
/// every fresh packet to be relayed.
pub struct NodeApp {
    relay: bool,
    subscriber: Option<mpsc::UnboundedSender<DeliveredMessage>>,
    delivered: u64,
    sent: u64,
    dropped: u64,
}

impl NodeApp {
    pub fn new() -> Self {
        Self {
            relay: true,
            subscriber: None,
            delivered: 0,
            sent: 0,
            dropped: 0,
        }
    }

    /// Stop relaying: deliveries still happen, nothing is forwarded.
    pub fn without_relay(mut self) -> Self {
        self.relay = false;
        self
    }

    /// Forward deliveries to the returned receiver.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<DeliveredMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscriber = Some(tx);
        rx
    }

    pub fn delivered_count(&self) -> u64 {
        self.delivered
    }

    pub fn sent_count(&self) -> u64 {
        self.sent
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }
}

impl Default for NodeApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FloodCallbacks for NodeApp {
    fn recv(&mut self, payload: &mut PacketBuf, delivery: &Delivery) -> bool {
        self.delivered += 1;
        info!(
            originator = %delivery.originator,
            from = %delivery.from,
            seqno = %delivery.seqno,
            hops = delivery.hops,
            "flood received: {}",
            String::from_utf8_lossy(payload.as_slice())
        );

        if let Some(tx) = &self.subscriber {
            let message = DeliveredMessage {
                delivery: *delivery,
                payload: payload.as_slice().to_vec(),
            };
            if tx.send(message).is_err() {
                warn!("delivery subscriber went away");
                self.subscriber = None;
            }
        }

        self.relay
    }

    fn sent(&mut self, channel: Channel) {
        self.sent += 1;
        debug!(%channel, "flood packet transmitted");
    }

    fn dropped(&mut self, channel: Channel) {
        self.dropped += 1;
        debug!(%channel, "flood packet dropped before transmission");
    }
}
