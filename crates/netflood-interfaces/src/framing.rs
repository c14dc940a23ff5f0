//! Link-layer broadcast framing.
//!
//! Every frame on the medium is
//! `[channel: u16 big-endian][sender: 2 bytes][packet...]`. The channel lets a
//! receiver skip traffic for channels it has not opened, and the sender
//! address is what the flood layer reports as the neighbor a packet came
//! from.

use netflood_core::constants::LINKADDR_SIZE;
use netflood_core::types::{Channel, LinkAddress};

use crate::error::FrameError;

/// Bytes of link header in front of the packet.
pub const FRAME_HEADER_SIZE: usize = 2 + LINKADDR_SIZE;

/// One decoded broadcast frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastFrame {
    pub channel: Channel,
    pub sender: LinkAddress,
    pub packet: Vec<u8>,
}

impl BroadcastFrame {
    pub fn new(channel: Channel, sender: LinkAddress, packet: impl Into<Vec<u8>>) -> Self {
        Self {
            channel,
            sender,
            packet: packet.into(),
        }
    }

    /// Serialize for transmission.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(FRAME_HEADER_SIZE + self.packet.len());
        out.extend_from_slice(&self.channel.0.to_be_bytes());
        out.extend_from_slice(self.sender.as_ref());
        out.extend_from_slice(&self.packet);
        out
    }

    /// Serialize, refusing frames larger than `mtu`.
    pub fn encode_within(&self, mtu: usize) -> Result<Vec<u8>, FrameError> {
        let size = FRAME_HEADER_SIZE + self.packet.len();
        if size > mtu {
            return Err(FrameError::TooLarge {
                max: mtu,
                actual: size,
            });
        }
        Ok(self.encode())
    }

    pub fn decode(raw: &[u8]) -> Result<Self, FrameError> {
        if raw.len() < FRAME_HEADER_SIZE {
            return Err(FrameError::TooShort {
                min: FRAME_HEADER_SIZE,
                actual: raw.len(),
            });
        }

        let channel = Channel(u16::from_be_bytes([raw[0], raw[1]]));
        let sender = LinkAddress::new([raw[2], raw[3]]);

        Ok(Self {
            channel,
            sender,
            packet: raw[FRAME_HEADER_SIZE..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_layout() {
        let frame = BroadcastFrame::new(Channel(0x0102), LinkAddress::new([7, 9]), vec![0xAA, 0xBB]);
        assert_eq!(frame.encode(), vec![0x01, 0x02, 7, 9, 0xAA, 0xBB]);
    }

    #[test]
    fn test_decode() {
        let frame = BroadcastFrame::decode(&[0x00, 0x81, 1, 0, 0xDE, 0xAD]).unwrap();
        assert_eq!(frame.channel, Channel(129));
        assert_eq!(frame.sender, LinkAddress::new([1, 0]));
        assert_eq!(frame.packet, vec![0xDE, 0xAD]);
    }

    #[test]
    fn test_empty_packet_allowed() {
        let frame = BroadcastFrame::decode(&[0, 0, 0, 0]).unwrap();
        assert!(frame.packet.is_empty());
    }

    #[test]
    fn test_decode_too_short() {
        assert_eq!(
            BroadcastFrame::decode(&[0, 1, 2]),
            Err(FrameError::TooShort { min: 4, actual: 3 })
        );
    }

    #[test]
    fn test_encode_within_mtu() {
        let frame = BroadcastFrame::new(Channel(1), LinkAddress::NULL, vec![0; 10]);
        assert_eq!(frame.encode_within(14).unwrap().len(), 14);
        assert_eq!(
            frame.encode_within(13),
            Err(FrameError::TooLarge { max: 13, actual: 14 })
        );
    }
}
