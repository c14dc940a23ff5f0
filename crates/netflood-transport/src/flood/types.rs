//! Outcome types for received flood packets.

use netflood_core::seqno::EncodedSeqno;
use netflood_core::types::{Channel, LinkAddress};

/// What the application is told about a delivered packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Channel of the connection delivering the packet.
    pub channel: Channel,
    /// Neighbor the packet was received from.
    pub from: LinkAddress,
    /// Node that originated the flood.
    pub originator: LinkAddress,
    pub seqno: EncodedSeqno,
    /// Hops travelled before reaching this node.
    pub hops: u8,
}

/// Result of handing a received packet to a flood connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvOutcome {
    /// Too short to carry a flood header; ignored.
    Malformed,
    /// Already seen; neither delivered nor relayed.
    Duplicate,
    /// Delivered to the application.
    Delivered(RelayDecision),
}

/// Why a delivered packet was or was not relayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayDecision {
    /// Handed to the transport carrying `hops`.
    Relayed { hops: u8 },
    /// The application declined.
    Declined,
    /// Received at or beyond the hop ceiling.
    HopLimit,
    /// No snapshot slot was free, so the packet could not be rebuilt.
    NoSnapshot,
    /// The transport refused the relay.
    TransportRejected,
}

impl RecvOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, RecvOutcome::Delivered(_))
    }

    pub fn is_relayed(&self) -> bool {
        matches!(self, RecvOutcome::Delivered(RelayDecision::Relayed { .. }))
    }
}
