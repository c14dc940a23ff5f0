//! Protocol constants for the flood layer.

// Wire format sizes
pub const LINKADDR_SIZE: usize = 2;
pub const SEQNO_SIZE: usize = 1;
pub const HOPS_SIZE: usize = 1;
pub const HEADER_SIZE: usize = LINKADDR_SIZE + SEQNO_SIZE + HOPS_SIZE;

// Offsets of header fields within a packet
pub const ORIGINATOR_OFFSET: usize = 0;
pub const SEQNO_OFFSET: usize = LINKADDR_SIZE;
pub const HOPS_OFFSET: usize = LINKADDR_SIZE + SEQNO_SIZE;

// Shared packet buffer geometry
pub const PACKETBUF_SIZE: usize = 128;
pub const PACKETBUF_HDR_SIZE: usize = 48;

/// Default number of snapshot slots in a [`QueueBufPool`](crate::QueueBufPool).
pub const QUEUEBUF_NUM: usize = 8;

/// Number of distinct ordinals before the generation bit flips.
pub const SEQNO_ORDINALS: u8 = 128;

/// Largest payload whose flood packet, header included, fits a receiver's
/// [`PacketBuf`](crate::PacketBuf).
pub const MAX_PAYLOAD_SIZE: usize = PACKETBUF_SIZE - HEADER_SIZE;
