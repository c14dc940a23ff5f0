//! Flood header wire format.
//!
//! Layout: `originator(2) + seqno(1) + hops(1)`, followed by the payload.
//! All fields are single bytes or byte arrays, so there is no byte order.

use crate::constants::{HEADER_SIZE, HOPS_OFFSET, LINKADDR_SIZE, ORIGINATOR_OFFSET, SEQNO_OFFSET};
use crate::error::PacketError;
use crate::seqno::EncodedSeqno;
use crate::types::LinkAddress;

/// Header prepended to every flooded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloodHeader {
    pub originator: LinkAddress,
    pub seqno: EncodedSeqno,
    pub hops: u8,
}

impl FloodHeader {
    /// Header for a freshly originated packet.
    pub const fn origin(originator: LinkAddress, seqno: EncodedSeqno) -> Self {
        Self {
            originator,
            seqno,
            hops: 0,
        }
    }

    /// Parse the header at the front of `raw`.
    pub fn parse(raw: &[u8]) -> Result<Self, PacketError> {
        if raw.len() < HEADER_SIZE {
            return Err(PacketError::TooShort {
                min: HEADER_SIZE,
                actual: raw.len(),
            });
        }

        let mut addr = [0u8; LINKADDR_SIZE];
        addr.copy_from_slice(&raw[ORIGINATOR_OFFSET..ORIGINATOR_OFFSET + LINKADDR_SIZE]);

        Ok(Self {
            originator: LinkAddress::new(addr),
            seqno: EncodedSeqno::from_byte(raw[SEQNO_OFFSET]),
            hops: raw[HOPS_OFFSET],
        })
    }

    /// Serialize to wire bytes.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[ORIGINATOR_OFFSET..ORIGINATOR_OFFSET + LINKADDR_SIZE]
            .copy_from_slice(self.originator.as_ref());
        out[SEQNO_OFFSET] = self.seqno.to_byte();
        out[HOPS_OFFSET] = self.hops;
        out
    }

    /// Overwrite the header at the front of `raw`.
    pub fn write_to(&self, raw: &mut [u8]) -> Result<(), PacketError> {
        if raw.len() < HEADER_SIZE {
            return Err(PacketError::TooShort {
                min: HEADER_SIZE,
                actual: raw.len(),
            });
        }
        raw[..HEADER_SIZE].copy_from_slice(&self.to_bytes());
        Ok(())
    }

    /// The same header one hop further from the originator.
    pub const fn next_hop(self) -> Self {
        Self {
            hops: self.hops.saturating_add(1),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_layout() {
        let hdr = FloodHeader {
            originator: LinkAddress::new([0x0A, 0x0B]),
            seqno: EncodedSeqno::encode(3),
            hops: 7,
        };
        assert_eq!(hdr.to_bytes(), [0x0A, 0x0B, 0x06, 0x07]);
    }

    #[test]
    fn test_parse_ignores_payload() {
        let raw = [0x01, 0x00, 0x02, 0x00, b'h', b'i'];
        let hdr = FloodHeader::parse(&raw).unwrap();
        assert_eq!(hdr.originator, LinkAddress::new([1, 0]));
        assert_eq!(hdr.seqno, EncodedSeqno::encode(1));
        assert_eq!(hdr.hops, 0);
    }

    #[test]
    fn test_parse_too_short() {
        let err = FloodHeader::parse(&[0x01, 0x00, 0x02]).unwrap_err();
        assert_eq!(err, PacketError::TooShort { min: 4, actual: 3 });
    }

    #[test]
    fn test_write_to_preserves_payload() {
        let mut raw = [0u8, 0, 0, 0, 0xEE, 0xFF];
        let hdr = FloodHeader::origin(LinkAddress::new([2, 1]), EncodedSeqno::encode(200));
        hdr.write_to(&mut raw).unwrap();
        assert_eq!(raw, [2, 1, EncodedSeqno::encode(200).to_byte(), 0, 0xEE, 0xFF]);
    }

    #[test]
    fn test_next_hop_increments_only_hops() {
        let hdr = FloodHeader::origin(LinkAddress::new([1, 1]), EncodedSeqno::encode(9));
        let relayed = hdr.next_hop();
        assert_eq!(relayed.hops, 1);
        assert_eq!(relayed.originator, hdr.originator);
        assert_eq!(relayed.seqno, hdr.seqno);
    }

    #[test]
    fn test_next_hop_saturates() {
        let hdr = FloodHeader {
            originator: LinkAddress::NULL,
            seqno: EncodedSeqno::default(),
            hops: u8::MAX,
        };
        assert_eq!(hdr.next_hop().hops, u8::MAX);
    }
}
