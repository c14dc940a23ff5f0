//! Flood layer defaults.

use netflood_core::constants::{HEADER_SIZE, HOPS_SIZE};

use crate::transport::SendQuality;

/// Hop count at which a packet is still delivered but never relayed.
pub const HOPS_MAX: u8 = 16;

/// Default number of originators remembered per connection.
pub const PACKET_HISTORY_SIZE: usize = 8;

/// Default origination queue time in seconds (send on the next poll).
pub const DEFAULT_QUEUE_TIME: f64 = 0.0;

/// Default relay queue time in seconds.
pub const DEFAULT_RELAY_QUEUE_TIME: f64 = 0.5;

/// Origination compares the whole header, hop count included.
pub const ORIGIN_QUALITY: SendQuality = SendQuality(HEADER_SIZE as u8);

/// Relays compare originator and seqno only, so copies of the same message
/// overheard at other hop counts still count as duplicates.
pub const RELAY_QUALITY: SendQuality = SendQuality((HEADER_SIZE - HOPS_SIZE) as u8);
