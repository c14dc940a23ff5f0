//! Per-originator packet history.
//!
//! A fixed number of slots, each remembering the latest encoded sequence
//! number seen from one originator. Known originators are updated in place.
//! A new originator is written at the cursor slot, evicting its occupant,
//! and the cursor advances modulo the capacity. Refreshing an existing
//! entry never moves the cursor, so eviction is FIFO over first sightings.

use netflood_core::seqno::EncodedSeqno;
use netflood_core::types::LinkAddress;

/// One remembered originator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub originator: LinkAddress,
    pub last_seqno: EncodedSeqno,
}

/// Bounded table of the latest sequence number per originator.
#[derive(Debug, Clone)]
pub struct HistoryCache {
    slots: Vec<Option<HistoryEntry>>,
    cursor: usize,
}

impl HistoryCache {
    /// Create an empty cache with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be at least 1");
        Self {
            slots: vec![None; capacity],
            cursor: 0,
        }
    }

    /// Latest sequence number recorded for `originator`.
    pub fn lookup(&self, originator: &LinkAddress) -> Option<EncodedSeqno> {
        self.position(originator)
            .and_then(|i| self.slots[i])
            .map(|entry| entry.last_seqno)
    }

    /// Slot index holding `originator`, if tracked.
    pub fn position(&self, originator: &LinkAddress) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.is_some_and(|entry| entry.originator == *originator))
    }

    /// Record `seqno` as the latest from `originator`.
    ///
    /// Returns the entry evicted to make room, if any.
    pub fn record(
        &mut self,
        originator: LinkAddress,
        seqno: EncodedSeqno,
    ) -> Option<HistoryEntry> {
        let entry = HistoryEntry {
            originator,
            last_seqno: seqno,
        };

        if let Some(i) = self.position(&originator) {
            self.slots[i] = Some(entry);
            return None;
        }

        let evicted = self.slots[self.cursor].replace(entry);
        self.cursor = (self.cursor + 1) % self.slots.len();
        evicted
    }

    /// Entry stored in slot `index`.
    pub fn slot(&self, index: usize) -> Option<&HistoryEntry> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Slot the next new originator will occupy.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Iterate over occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.slots.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(seed: u8) -> LinkAddress {
        LinkAddress::new([seed, 0])
    }

    fn seq(v: u8) -> EncodedSeqno {
        EncodedSeqno::encode(v)
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = HistoryCache::new(4);
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 4);
        assert_eq!(cache.cursor(), 0);
        assert_eq!(cache.lookup(&addr(1)), None);
    }

    #[test]
    #[should_panic(expected = "history capacity must be at least 1")]
    fn test_zero_capacity_panics() {
        let _ = HistoryCache::new(0);
    }

    #[test]
    fn test_record_and_lookup() {
        let mut cache = HistoryCache::new(4);
        assert_eq!(cache.record(addr(1), seq(5)), None);
        assert_eq!(cache.lookup(&addr(1)), Some(seq(5)));
        assert_eq!(cache.cursor(), 1);
    }

    #[test]
    fn test_existing_entry_updated_in_place() {
        let mut cache = HistoryCache::new(4);
        cache.record(addr(1), seq(1));
        cache.record(addr(2), seq(1));
        cache.record(addr(1), seq(2));

        assert_eq!(cache.position(&addr(1)), Some(0));
        assert_eq!(cache.lookup(&addr(1)), Some(seq(2)));
        assert_eq!(cache.len(), 2);
        // In-place updates leave the cursor alone
        assert_eq!(cache.cursor(), 2);
    }

    #[test]
    fn new_originator_evicts_cursor_slot() {
        // Two slots: X in 0, Y in 1, cursor wrapped back to 0
        let mut cache = HistoryCache::new(2);
        let (x, y, z) = (addr(b'X'), addr(b'Y'), addr(b'Z'));
        cache.record(x, seq(0));
        cache.record(y, seq(0));
        assert_eq!(cache.cursor(), 0);

        let evicted = cache.record(z, seq(0));
        assert_eq!(
            evicted,
            Some(HistoryEntry {
                originator: x,
                last_seqno: seq(0)
            })
        );
        assert_eq!(cache.slot(0).map(|e| e.originator), Some(z));
        assert_eq!(cache.slot(1).map(|e| e.originator), Some(y));
        assert_eq!(cache.lookup(&x), None);
        assert_eq!(cache.cursor(), 1);
    }

    #[test]
    fn test_refresh_does_not_protect_from_eviction() {
        let mut cache = HistoryCache::new(2);
        cache.record(addr(1), seq(0));
        cache.record(addr(2), seq(0));
        // Refreshing addr(1) many times does not change eviction order
        for v in 1..10 {
            cache.record(addr(1), seq(v));
        }
        cache.record(addr(3), seq(0));
        assert_eq!(cache.lookup(&addr(1)), None);
        assert_eq!(cache.lookup(&addr(2)), Some(seq(0)));
    }

    #[test]
    fn test_iter_yields_occupied_slots() {
        let mut cache = HistoryCache::new(3);
        cache.record(addr(1), seq(1));
        cache.record(addr(2), seq(2));
        let originators: Vec<_> = cache.iter().map(|e| e.originator).collect();
        assert_eq!(originators, vec![addr(1), addr(2)]);
    }

    #[test]
    fn test_null_address_not_matched_by_empty_slots() {
        let cache = HistoryCache::new(2);
        assert_eq!(cache.lookup(&LinkAddress::NULL), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn never_exceeds_capacity(
            capacity in 1..8usize,
            ops in proptest::collection::vec((0..16u8, any::<u8>()), 0..64),
        ) {
            let mut cache = HistoryCache::new(capacity);
            for (who, v) in ops {
                cache.record(LinkAddress::new([who, 0]), EncodedSeqno::from_byte(v));
                prop_assert!(cache.len() <= capacity);
                prop_assert!(cache.cursor() < capacity);

                let distinct: HashSet<_> = cache.iter().map(|e| e.originator).collect();
                prop_assert_eq!(distinct.len(), cache.len());
            }
        }

        #[test]
        fn latest_record_is_visible(
            ops in proptest::collection::vec((0..4u8, any::<u8>()), 1..32),
        ) {
            // Capacity covers every originator, so nothing is evicted
            let mut cache = HistoryCache::new(4);
            for &(who, v) in &ops {
                let originator = LinkAddress::new([who, 0]);
                cache.record(originator, EncodedSeqno::from_byte(v));
                prop_assert_eq!(cache.lookup(&originator), Some(EncodedSeqno::from_byte(v)));
            }
        }
    }
}
