//! Encoded flood sequence numbers and the freshness test.
//!
//! An originator's 8-bit counter `v` travels on the wire as
//! `(v << 1) | (v > 127)`, truncated to one byte. The upper seven bits hold
//! the ordinal `v mod 128`; the low bit is a generation marker that flips
//! every 128 increments. Comparing ordinals only across a generation flip is
//! what lets a receiver accept `0` after `127`.
//!
//! The split is tied to the 8-bit counter width.

use core::fmt;

use crate::constants::SEQNO_ORDINALS;

/// One-byte wire sequence number: 7-bit ordinal plus 1-bit generation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EncodedSeqno(u8);

impl EncodedSeqno {
    /// Encode a raw local counter value.
    pub const fn encode(counter: u8) -> Self {
        let mut shifted = counter.wrapping_shl(1);
        if counter >= SEQNO_ORDINALS {
            shifted |= 1;
        }
        Self(shifted)
    }

    /// Wrap a byte read from the wire.
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub const fn to_byte(self) -> u8 {
        self.0
    }

    /// Position within the current generation (`counter mod 128`).
    pub const fn ordinal(self) -> u8 {
        self.0 >> 1
    }

    /// Generation marker (the counter's high bit).
    pub const fn generation(self) -> u8 {
        self.0 & 1
    }

    /// Whether `self` is newer than `last`, the latest value recorded for
    /// the same originator.
    pub const fn is_newer_than(self, last: EncodedSeqno) -> bool {
        let wrapped =
            self.generation() != last.generation() && self.ordinal() < last.ordinal();
        wrapped || self.ordinal() > last.ordinal()
    }
}

impl fmt::Display for EncodedSeqno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ordinal(), self.generation())
    }
}

impl fmt::Debug for EncodedSeqno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedSeqno({:#04x} = {self})", self.0)
    }
}

/// Freshness test for a received sequence number.
///
/// With no recorded value for the originator every candidate is fresh.
pub fn is_fresh(candidate: EncodedSeqno, last: Option<EncodedSeqno>) -> bool {
    match last {
        None => true,
        Some(last) => candidate.is_newer_than(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_low_half() {
        assert_eq!(EncodedSeqno::encode(0).to_byte(), 0);
        assert_eq!(EncodedSeqno::encode(1).to_byte(), 2);
        assert_eq!(EncodedSeqno::encode(127).to_byte(), 254);
    }

    #[test]
    fn test_encode_high_half_sets_generation() {
        assert_eq!(EncodedSeqno::encode(128).to_byte(), 1);
        assert_eq!(EncodedSeqno::encode(129).to_byte(), 3);
        assert_eq!(EncodedSeqno::encode(255).to_byte(), 255);
    }

    #[test]
    fn test_ordinal_and_generation() {
        let s = EncodedSeqno::encode(200);
        assert_eq!(s.ordinal(), 72);
        assert_eq!(s.generation(), 1);

        let s = EncodedSeqno::encode(5);
        assert_eq!(s.ordinal(), 5);
        assert_eq!(s.generation(), 0);
    }

    #[test]
    fn test_unknown_originator_is_fresh() {
        assert!(is_fresh(EncodedSeqno::encode(0), None));
        assert!(is_fresh(EncodedSeqno::encode(200), None));
    }

    #[test]
    fn test_same_value_is_stale() {
        for v in 0..=255u8 {
            let s = EncodedSeqno::encode(v);
            assert!(!is_fresh(s, Some(s)), "value {v} judged fresh against itself");
        }
    }

    #[test]
    fn test_higher_ordinal_is_fresh() {
        assert!(is_fresh(EncodedSeqno::encode(6), Some(EncodedSeqno::encode(5))));
        assert!(!is_fresh(EncodedSeqno::encode(5), Some(EncodedSeqno::encode(6))));
    }

    #[test]
    fn wraparound_low_ordinal_after_generation_flip_is_fresh() {
        // counter 127 -> 255 on the wire, counter 0 after the wrap -> 0
        let last = EncodedSeqno::from_byte(255);
        assert_eq!((last.ordinal(), last.generation()), (127, 1));
        let candidate = EncodedSeqno::from_byte(0);
        assert_eq!((candidate.ordinal(), candidate.generation()), (0, 0));
        assert!(is_fresh(candidate, Some(last)));
    }

    #[test]
    fn test_every_successor_is_fresh() {
        for v in 0..=255u8 {
            let last = EncodedSeqno::encode(v);
            let next = EncodedSeqno::encode(v.wrapping_add(1));
            assert!(
                is_fresh(next, Some(last)),
                "successor of {v} not fresh: {next:?} vs {last:?}"
            );
        }
    }

    #[test]
    fn test_every_predecessor_is_stale() {
        for v in 0..=255u8 {
            let last = EncodedSeqno::encode(v);
            let prev = EncodedSeqno::encode(v.wrapping_sub(1));
            // At a generation boundary the predecessor carries ordinal 127
            // against ordinal 0 and is accepted.
            if v == 128 || v == 0 {
                continue;
            }
            assert!(
                !is_fresh(prev, Some(last)),
                "predecessor of {v} judged fresh: {prev:?} vs {last:?}"
            );
        }
    }

    #[test]
    fn test_display() {
        use alloc::format;
        assert_eq!(format!("{}", EncodedSeqno::encode(130)), "2/1");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn encode_recovers_counter_mod_128(v in any::<u8>()) {
            let s = EncodedSeqno::encode(v);
            prop_assert_eq!(s.ordinal(), v % 128);
            prop_assert_eq!(s.generation(), v >> 7);
        }

        #[test]
        fn byte_roundtrip(b in any::<u8>()) {
            prop_assert_eq!(EncodedSeqno::from_byte(b).to_byte(), b);
        }

        #[test]
        fn never_fresh_against_itself(b in any::<u8>()) {
            let s = EncodedSeqno::from_byte(b);
            prop_assert!(!is_fresh(s, Some(s)));
        }

        #[test]
        fn same_generation_orders_by_ordinal(a in 0..128u8, b in 0..128u8, generation in 0..=1u8) {
            let x = EncodedSeqno::from_byte((a << 1) | generation);
            let y = EncodedSeqno::from_byte((b << 1) | generation);
            prop_assert_eq!(x.is_newer_than(y), a > b);
        }
    }
}
