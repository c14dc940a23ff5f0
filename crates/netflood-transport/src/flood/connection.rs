//! The flood connection state machine.

use tracing::{debug, info, trace, warn};

use netflood_core::constants::HEADER_SIZE;
use netflood_core::packet::buf::PacketBuf;
use netflood_core::packet::header::FloodHeader;
use netflood_core::packet::queuebuf::{QueueBuf, QueueBufPool};
use netflood_core::seqno::{EncodedSeqno, is_fresh};
use netflood_core::types::{Channel, LinkAddress};

use super::callbacks::FloodCallbacks;
use super::config::{FloodConfig, HistoryPolicy};
use super::constants::{ORIGIN_QUALITY, RELAY_QUALITY};
use super::types::{Delivery, RecvOutcome, RelayDecision};
use crate::error::FloodError;
use crate::history::HistoryCache;
use crate::transport::Transport;

/// A node's binding to one flood channel.
///
/// Owns the transport, the application callbacks, the local sequence
/// counter and the originator history. Every entry point runs to completion
/// on `&mut self`.
pub struct FloodConnection<T: Transport, A: FloodCallbacks> {
    local_addr: LinkAddress,
    config: FloodConfig,
    transport: T,
    callbacks: A,
    local_seq: u8,
    history: HistoryCache,
    snapshots: QueueBufPool,
}

impl<T: Transport, A: FloodCallbacks> FloodConnection<T, A> {
    /// Validate `config`, bind `transport` to the configured channel and
    /// start with an empty history.
    pub fn open(
        local_addr: LinkAddress,
        config: FloodConfig,
        mut transport: T,
        callbacks: A,
    ) -> Result<Self, FloodError> {
        config.validate()?;
        transport.open(config.channel())?;

        info!(
            channel = config.channel,
            address = %local_addr,
            history_size = config.history_size,
            hops_max = config.hops_max,
            "flood connection opened"
        );

        Ok(Self {
            local_addr,
            history: HistoryCache::new(config.history_size),
            snapshots: QueueBufPool::new(config.snapshot_pool_size),
            local_seq: config.initial_seqno,
            config,
            transport,
            callbacks,
        })
    }

    /// Release the transport binding and hand back transport and callbacks.
    pub fn close(mut self) -> (T, A) {
        self.transport.close();
        info!(channel = self.config.channel, "flood connection closed");
        (self.transport, self.callbacks)
    }

    /// Abort whatever the transport still has queued for this connection.
    pub fn cancel(&mut self) {
        debug!(channel = self.config.channel, "cancelling queued flood packet");
        self.transport.cancel();
    }

    /// Originate a flood carrying the payload staged in `buf`.
    ///
    /// On success the flood header has been prepended to `buf` and the
    /// sequence number used is returned. On failure `buf` still holds only
    /// the payload and no state has changed.
    pub fn send(&mut self, buf: &mut PacketBuf) -> Result<EncodedSeqno, FloodError> {
        buf.hdr_alloc(HEADER_SIZE)
            .map_err(FloodError::NoHeaderSpace)?;

        let seqno = EncodedSeqno::encode(self.local_seq);
        FloodHeader::origin(self.local_addr, seqno).write_to(buf.as_mut_slice())?;

        if let Err(e) = self
            .transport
            .send(buf.as_slice(), self.config.queue_time, ORIGIN_QUALITY)
        {
            warn!(channel = self.config.channel, %seqno, "flood send rejected: {e}");
            buf.hdr_reduce(HEADER_SIZE)
                .map_err(FloodError::NoHeaderSpace)?;
            return Err(e.into());
        }

        debug!(
            channel = self.config.channel,
            %seqno,
            len = buf.len() - HEADER_SIZE,
            "originated flood"
        );

        // Our own packet echoed back by a neighbor must read as a duplicate.
        self.remember(self.local_addr, seqno);
        self.local_seq = self.local_seq.wrapping_add(1);
        Ok(seqno)
    }

    /// Handle a packet the transport received from neighbor `from`.
    ///
    /// `buf` holds the whole packet, header first. When the packet is
    /// delivered the application sees `buf` with the header stripped; after
    /// a relay `buf` again holds the relayed packet.
    pub fn on_receive(&mut self, buf: &mut PacketBuf, from: LinkAddress) -> RecvOutcome {
        let header = match FloodHeader::parse(buf.as_slice()) {
            Ok(header) => header,
            Err(e) => {
                debug!(%from, "ignoring malformed flood packet: {e}");
                return RecvOutcome::Malformed;
            }
        };

        // The application may reuse `buf`, so keep a copy for relaying.
        let snapshot = self.snapshots.snapshot(buf);
        if snapshot.is_none() {
            warn!(
                originator = %header.originator,
                seqno = %header.seqno,
                "snapshot pool exhausted, packet will not be relayed"
            );
        }

        if buf.hdr_reduce(HEADER_SIZE).is_err() {
            return RecvOutcome::Malformed;
        }

        let last = self.history.lookup(&header.originator);
        if !is_fresh(header.seqno, last) {
            debug!(
                %from,
                originator = %header.originator,
                seqno = %header.seqno,
                "duplicate flood packet suppressed"
            );
            return RecvOutcome::Duplicate;
        }

        let delivery = Delivery {
            channel: self.config.channel(),
            from,
            originator: header.originator,
            seqno: header.seqno,
            hops: header.hops,
        };
        trace!(?delivery, len = buf.len(), "delivering flood packet");
        let wants_relay = self.callbacks.recv(buf, &delivery);

        let decision = if wants_relay {
            self.relay(buf, header, snapshot)
        } else {
            RelayDecision::Declined
        };

        let record = match self.config.history_policy {
            HistoryPolicy::RelayedOnly => matches!(decision, RelayDecision::Relayed { .. }),
            HistoryPolicy::AllFresh => true,
        };
        if record {
            self.remember(header.originator, header.seqno);
        }

        RecvOutcome::Delivered(decision)
    }

    /// Rebuild the received packet from its snapshot and hand it back to the
    /// transport one hop further along.
    fn relay(
        &mut self,
        buf: &mut PacketBuf,
        header: FloodHeader,
        snapshot: Option<QueueBuf>,
    ) -> RelayDecision {
        let Some(snapshot) = snapshot else {
            return RelayDecision::NoSnapshot;
        };

        if header.hops >= self.config.hops_max {
            debug!(
                originator = %header.originator,
                seqno = %header.seqno,
                hops = header.hops,
                "hop limit reached, not relaying"
            );
            return RelayDecision::HopLimit;
        }

        if let Err(e) = snapshot.restore(buf) {
            warn!(originator = %header.originator, "cannot restore packet for relay: {e}");
            return RelayDecision::NoSnapshot;
        }

        let relayed = header.next_hop();
        if let Err(e) = relayed.write_to(buf.as_mut_slice()) {
            warn!(originator = %header.originator, "cannot rewrite relay header: {e}");
            return RelayDecision::NoSnapshot;
        }

        match self
            .transport
            .send(buf.as_slice(), self.config.relay_queue_time, RELAY_QUALITY)
        {
            Ok(()) => {
                debug!(
                    originator = %relayed.originator,
                    seqno = %relayed.seqno,
                    hops = relayed.hops,
                    "relaying flood packet"
                );
                RelayDecision::Relayed { hops: relayed.hops }
            }
            Err(e) => {
                warn!(originator = %relayed.originator, "relay rejected by transport: {e}");
                RelayDecision::TransportRejected
            }
        }
    }

    fn remember(&mut self, originator: LinkAddress, seqno: EncodedSeqno) {
        if let Some(evicted) = self.history.record(originator, seqno) {
            trace!(
                evicted = %evicted.originator,
                by = %originator,
                "history slot reused"
            );
        }
    }

    /// The transport transmitted a packet for this connection.
    pub fn on_sent(&mut self) {
        self.callbacks.sent(self.config.channel());
    }

    /// The transport dropped a packet for this connection.
    pub fn on_dropped(&mut self) {
        self.callbacks.dropped(self.config.channel());
    }

    pub fn local_addr(&self) -> LinkAddress {
        self.local_addr
    }

    pub fn channel(&self) -> Channel {
        self.config.channel()
    }

    pub fn config(&self) -> &FloodConfig {
        &self.config
    }

    /// Counter value the next origination will use.
    pub fn local_seq(&self) -> u8 {
        self.local_seq
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    /// Handle to the snapshot pool used while relaying.
    pub fn snapshot_pool(&self) -> &QueueBufPool {
        &self.snapshots
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn callbacks(&self) -> &A {
        &self.callbacks
    }

    pub fn callbacks_mut(&mut self) -> &mut A {
        &mut self.callbacks
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::testing::{RecordingTransport, ScriptedCallbacks};
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn relay_only_below_hop_ceiling(
            hops_max in 0..32u8,
            hops in 0..40u8,
            counter in any::<u8>(),
        ) {
            let config = FloodConfig { hops_max, ..FloodConfig::default() };
            let mut conn = FloodConnection::open(
                LinkAddress::new([1, 0]),
                config,
                RecordingTransport::new(),
                ScriptedCallbacks::relaying(),
            ).unwrap();

            let header = FloodHeader {
                originator: LinkAddress::new([7, 7]),
                seqno: EncodedSeqno::encode(counter),
                hops,
            };
            let mut buf = PacketBuf::new();
            buf.copy_from(&header.to_bytes()).unwrap();

            let outcome = conn.on_receive(&mut buf, LinkAddress::new([2, 0]));
            prop_assert!(outcome.is_delivered());
            prop_assert_eq!(outcome.is_relayed(), hops < hops_max);
            prop_assert_eq!(conn.transport().sent.len(), usize::from(hops < hops_max));
        }
    }
}
