//! The transport boundary beneath the flood layer.

use netflood_core::types::Channel;

use crate::error::TransportError;

/// Per-send hint to the transport: the number of leading packet bytes it
/// compares when deciding that an overheard packet duplicates one it still
/// has queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SendQuality(pub u8);

impl SendQuality {
    pub const fn prefix_len(self) -> usize {
        self.0 as usize
    }
}

/// A broadcast transport the flood layer hands packets to.
///
/// Implementations own all queuing and delay. `send` only accepts or rejects
/// the packet; completion is reported later through
/// [`FloodConnection::on_sent`](crate::flood::FloodConnection::on_sent) and
/// [`FloodConnection::on_dropped`](crate::flood::FloodConnection::on_dropped).
pub trait Transport {
    /// Bind to a broadcast channel.
    fn open(&mut self, channel: Channel) -> Result<(), TransportError>;

    /// Accept `packet` for transmission after up to `queue_time` seconds.
    fn send(
        &mut self,
        packet: &[u8],
        queue_time: f64,
        quality: SendQuality,
    ) -> Result<(), TransportError>;

    /// Abort any packet still waiting to be transmitted.
    fn cancel(&mut self);

    /// Release the channel binding.
    fn close(&mut self);
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn open(&mut self, channel: Channel) -> Result<(), TransportError> {
        (**self).open(channel)
    }

    fn send(
        &mut self,
        packet: &[u8],
        queue_time: f64,
        quality: SendQuality,
    ) -> Result<(), TransportError> {
        (**self).send(packet, queue_time, quality)
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }

    fn close(&mut self) {
        (**self).close()
    }
}
