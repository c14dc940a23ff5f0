//! Application callbacks for a flood connection.

use netflood_core::packet::buf::PacketBuf;
use netflood_core::types::Channel;

use super::types::Delivery;

/// Application hooks invoked by a [`FloodConnection`](super::FloodConnection).
///
/// `sent` and `dropped` default to doing nothing.
pub trait FloodCallbacks {
    /// A packet not seen before has arrived.
    ///
    /// `payload` holds only the application payload. The application may
    /// read, overwrite or clear it; the connection keeps its own copy for
    /// relaying. Return `true` to have the packet relayed.
    fn recv(&mut self, payload: &mut PacketBuf, delivery: &Delivery) -> bool;

    /// The transport transmitted a packet for this connection.
    fn sent(&mut self, _channel: Channel) {}

    /// The transport gave up on a packet for this connection.
    fn dropped(&mut self, _channel: Channel) {}
}
