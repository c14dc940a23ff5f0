//! Test doubles for the flood layer.
//!
//! [`RecordingTransport`] accepts (or refuses) every send and keeps the
//! packets for inspection; [`ScriptedCallbacks`] records deliveries and
//! answers relay requests with a fixed decision.
//!
//! ```rust,ignore
//! use netflood_transport::testing::{RecordingTransport, ScriptedCallbacks};
//!
//! let mut conn = FloodConnection::open(addr, config, RecordingTransport::new(), ScriptedCallbacks::relaying())?;
//! conn.on_receive(&mut buf, neighbor);
//! assert_eq!(conn.transport().sent.len(), 1);
//! ```

use netflood_core::packet::buf::PacketBuf;
use netflood_core::types::Channel;

use crate::error::TransportError;
use crate::flood::{Delivery, FloodCallbacks};
use crate::transport::{SendQuality, Transport};

/// A packet handed to a [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct SentPacket {
    pub bytes: Vec<u8>,
    pub queue_time: f64,
    pub quality: SendQuality,
}

/// Transport that records sends instead of transmitting them.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub channel: Option<Channel>,
    pub sent: Vec<SentPacket>,
    /// Refuse every send while set.
    pub reject_sends: bool,
    pub cancels: usize,
    pub closed: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that refuses every send.
    pub fn rejecting() -> Self {
        Self {
            reject_sends: true,
            ..Self::default()
        }
    }

    /// Remove and return everything sent so far.
    pub fn take_sent(&mut self) -> Vec<SentPacket> {
        std::mem::take(&mut self.sent)
    }
}

impl Transport for RecordingTransport {
    fn open(&mut self, channel: Channel) -> Result<(), TransportError> {
        if let Some(open) = self.channel {
            return Err(TransportError::AlreadyOpen(open.0));
        }
        self.channel = Some(channel);
        self.closed = false;
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
        if self.reject_sends {
            return Err(TransportError::Rejected("refused by test transport".into()));
        }
        self.sent.push(SentPacket {
            bytes: packet.to_vec(),
            queue_time,
            quality,
        });
        Ok(())
    }

    fn cancel(&mut self) {
        self.cancels += 1;
    }

    fn close(&mut self) {
        self.channel = None;
        self.closed = true;
    }
}

/// A delivery seen by [`ScriptedCallbacks`].
#[derive(Debug, Clone, PartialEq)]
pub struct Received {
    pub delivery: Delivery,
    pub payload: Vec<u8>,
}

/// Callbacks that record deliveries and return a fixed relay decision.
#[derive(Debug, Default)]
pub struct ScriptedCallbacks {
    /// Value returned from every `recv`.
    pub relay: bool,
    /// Overwrite the shared buffer during `recv`, as an application reusing
    /// it for its own traffic would.
    pub clobber: bool,
    pub received: Vec<Received>,
    pub sent: usize,
    pub dropped: usize,
}

impl ScriptedCallbacks {
    pub fn relaying() -> Self {
        Self {
            relay: true,
            ..Self::default()
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }
}

impl FloodCallbacks for ScriptedCallbacks {
    fn recv(&mut self, payload: &mut PacketBuf, delivery: &Delivery) -> bool {
        self.received.push(Received {
            delivery: *delivery,
            payload: payload.as_slice().to_vec(),
        });
        if self.clobber {
            payload.clear();
            let _ = payload.copy_from(b"application reused the buffer");
        }
        self.relay
    }

    fn sent(&mut self, _channel: Channel) {
        self.sent += 1;
    }

    fn dropped(&mut self, _channel: Channel) {
        self.dropped += 1;
    }
}
