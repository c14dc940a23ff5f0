//! Core Node struct and async event loop.
//!
//! The node owns one flood connection over a polite broadcast transport.
//! Frames arriving on any interface are decoded and handed to the flood
//! layer; payloads submitted through an [`OriginateHandle`] are originated
//! as new floods; a periodic tick polls the polite transport and puts due
//! packets on every interface.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use netflood_core::constants::MAX_PAYLOAD_SIZE;
use netflood_core::packet::buf::PacketBuf;
use netflood_core::seqno::EncodedSeqno;
use netflood_core::types::LinkAddress;
use netflood_interfaces::{BroadcastFrame, UdpInterface};
use netflood_transport::{FloodConnection, PoliteAction, PoliteBroadcast, RecvOutcome};

use crate::app::{DeliveredMessage, NodeApp};
use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::interface_enum::AnyInterface;

/// Events delivered to the central event loop.
#[derive(Debug)]
enum NodeEvent {
    InboundFrame { interface: usize, raw: Vec<u8> },
    InterfaceDown { interface: usize },
    Originate(Vec<u8>),
}

/// Cloneable handle that stops a running node.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Cloneable handle that submits payloads for origination.
#[derive(Clone)]
pub struct OriginateHandle {
    tx: mpsc::Sender<NodeEvent>,
}

impl OriginateHandle {
    /// Queue `payload` to be flooded. Fails once the node has stopped or
    /// when the payload exceeds [`MAX_PAYLOAD_SIZE`].
    pub async fn originate(&self, payload: impl Into<Vec<u8>>) -> Result<(), NodeError> {
        let payload = payload.into();
        check_payload(&payload)?;
        self.tx
            .send(NodeEvent::Originate(payload))
            .await
            .map_err(|_| NodeError::Stopped)
    }
}

/// A flooding node: interfaces, one flood connection, and the event loop.
pub struct Node {
    address: LinkAddress,
    tick: Duration,
    flood: FloodConnection<PoliteBroadcast, NodeApp>,
    pending_interfaces: Vec<AnyInterface>,
    interfaces: Vec<Arc<AnyInterface>>,
    started: bool,
    buf: PacketBuf,
    clock: Instant,
    event_tx: mpsc::Sender<NodeEvent>,
    event_rx: mpsc::Receiver<NodeEvent>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    bridge_handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Node {
    /// Create a node with the UDP interfaces listed in `config`.
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let interfaces = config
            .interfaces
            .udp
            .iter()
            .cloned()
            .map(|c| AnyInterface::from(UdpInterface::new(c)))
            .collect();
        Self::with_interfaces(config, interfaces)
    }

    /// Create a node over caller-supplied interfaces.
    pub fn with_interfaces(
        config: NodeConfig,
        interfaces: Vec<AnyInterface>,
    ) -> Result<Self, NodeError> {
        config.validate()?;

        let address = match config.node.link_address()? {
            Some(address) => address,
            None => random_address(),
        };

        let transport = PoliteBroadcast::new(config.polite.clone());
        let app = if config.node.relay {
            NodeApp::new()
        } else {
            NodeApp::new().without_relay()
        };
        let flood = FloodConnection::open(address, config.flood.clone(), transport, app)?;

        let (event_tx, event_rx) = mpsc::channel(1024);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            address,
            tick: Duration::from_millis(config.node.tick_ms),
            flood,
            pending_interfaces: interfaces,
            interfaces: Vec::new(),
            started: false,
            buf: PacketBuf::new(),
            clock: Instant::now(),
            event_tx,
            event_rx,
            shutdown_tx,
            shutdown_rx,
            bridge_handles: Vec::new(),
        })
    }

    pub fn address(&self) -> LinkAddress {
        self.address
    }

    pub fn flood(&self) -> &FloodConnection<PoliteBroadcast, NodeApp> {
        &self.flood
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    pub fn originate_handle(&self) -> OriginateHandle {
        OriginateHandle {
            tx: self.event_tx.clone(),
        }
    }

    /// Receive every payload this node delivers.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<DeliveredMessage> {
        self.flood.callbacks_mut().subscribe()
    }

    /// Start all interfaces and their receive bridges.
    pub async fn start(&mut self) -> Result<(), NodeError> {
        if self.started {
            return Err(NodeError::AlreadyRunning);
        }
        self.started = true;

        for mut iface in self.pending_interfaces.drain(..) {
            if let Err(e) = iface.start().await {
                tracing::error!(interface = %iface.name(), "failed to start interface: {e}");
                return Err(NodeError::Interface(e));
            }
            info!(interface = %iface.name(), "interface started");
            self.interfaces.push(Arc::new(iface));
        }

        self.spawn_receive_bridges();
        info!(
            address = %self.address,
            channel = %self.flood.channel(),
            interfaces = self.interfaces.len(),
            "node started"
        );
        Ok(())
    }

    fn spawn_receive_bridges(&mut self) {
        for (index, iface) in self.interfaces.iter().enumerate() {
            if !iface.can_receive() {
                continue;
            }
            let iface = Arc::clone(iface);
            let event_tx = self.event_tx.clone();
            let mut shutdown_rx = self.shutdown_rx.clone();

            let handle = tokio::spawn(async move {
                loop {
                    tokio::select! {
                        biased;
                        _ = shutdown_rx.changed() => {
                            debug!(interface = %iface.name(), "receive bridge shutting down");
                            break;
                        }
                        result = iface.receive() => {
                            match result {
                                Ok(raw) => {
                                    let event = NodeEvent::InboundFrame { interface: index, raw };
                                    if event_tx.send(event).await.is_err() {
                                        break;
                                    }
                                }
                                Err(e) => {
                                    warn!(interface = %iface.name(), "receive error: {e}");
                                    let _ = event_tx
                                        .send(NodeEvent::InterfaceDown { interface: index })
                                        .await;
                                    break;
                                }
                            }
                        }
                    }
                }
            });
            self.bridge_handles.push(handle);
        }
    }

    /// Run the main event loop. Returns when shutdown is signalled.
    pub async fn run(&mut self) {
        let mut tick = tokio::time::interval(self.tick);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!("entering event loop");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => {
                    info!("shutdown signal received");
                    break;
                }

                // The node keeps its own sender, so the channel never closes
                Some(event) = self.event_rx.recv() => {
                    match event {
                        NodeEvent::InboundFrame { interface, raw } => {
                            self.handle_inbound_frame(interface, &raw);
                        }
                        NodeEvent::Originate(payload) => {
                            if let Err(e) = self.originate(&payload) {
                                warn!("flood origination failed: {e}");
                            }
                            self.poll_transport().await;
                        }
                        NodeEvent::InterfaceDown { interface } => {
                            warn!(interface, "interface down");
                        }
                    }
                }

                _ = tick.tick() => {
                    self.poll_transport().await;
                }
            }
        }
    }

    fn now(&self) -> f64 {
        self.clock.elapsed().as_secs_f64()
    }

    /// Start a new flood carrying `payload`.
    ///
    /// Payloads over [`MAX_PAYLOAD_SIZE`] are refused before any state
    /// changes, since no receiver could hold the resulting packet.
    pub fn originate(&mut self, payload: &[u8]) -> Result<EncodedSeqno, NodeError> {
        check_payload(payload)?;

        let now = self.now();
        self.flood.transport_mut().advance(now);

        self.buf.clear();
        self.buf
            .copy_from(payload)
            .map_err(|_| payload_too_large(payload))?;
        let seqno = self.flood.send(&mut self.buf)?;
        info!(%seqno, len = payload.len(), "flood originated");
        Ok(seqno)
    }

    fn handle_inbound_frame(&mut self, interface: usize, raw: &[u8]) {
        let frame = match BroadcastFrame::decode(raw) {
            Ok(frame) => frame,
            Err(e) => {
                debug!(interface, "dropping undecodable frame: {e}");
                return;
            }
        };

        if frame.channel != self.flood.channel() {
            trace!(interface, channel = %frame.channel, "frame for another channel");
            return;
        }
        if frame.sender == self.address {
            // Broadcast sockets hear their own transmissions
            return;
        }

        let now = self.now();
        let transport = self.flood.transport_mut();
        transport.advance(now);
        transport.overheard(&frame.packet);

        self.buf.clear();
        if let Err(e) = self.buf.copy_from(&frame.packet) {
            warn!(sender = %frame.sender, "inbound packet does not fit: {e}");
            return;
        }

        let outcome = self.flood.on_receive(&mut self.buf, frame.sender);
        if outcome == RecvOutcome::Malformed {
            debug!(sender = %frame.sender, "malformed flood packet");
        } else {
            trace!(sender = %frame.sender, ?outcome, "flood packet handled");
        }
    }

    /// Carry out whatever the polite transport has due.
    pub async fn poll_transport(&mut self) {
        let now = self.now();
        let actions = self.flood.transport_mut().poll(now);

        for action in actions {
            match action {
                PoliteAction::Transmit(packet) => {
                    let frame = BroadcastFrame::new(self.flood.channel(), self.address, packet);
                    if self.transmit_frame(&frame).await {
                        self.flood.on_sent();
                    } else {
                        self.flood.on_dropped();
                    }
                }
                PoliteAction::Dropped => self.flood.on_dropped(),
            }
        }
    }

    /// Send `frame` on every transmitting interface. True if any accepted it.
    async fn transmit_frame(&self, frame: &BroadcastFrame) -> bool {
        let mut delivered = false;
        for iface in self.interfaces.iter().filter(|i| i.can_transmit()) {
            let raw = match frame.encode_within(iface.mtu()) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(interface = %iface.name(), "frame not sent: {e}");
                    continue;
                }
            };
            match iface.transmit(&raw).await {
                Ok(()) => {
                    trace!(interface = %iface.name(), len = raw.len(), "frame transmitted");
                    delivered = true;
                }
                Err(e) => warn!(interface = %iface.name(), "transmit failed: {e}"),
            }
        }
        delivered
    }

    /// Shut down all interfaces and release the flood connection.
    pub async fn shutdown(mut self) {
        info!("shutting down node");
        let _ = self.shutdown_tx.send(true);

        self.flood.cancel();

        for handle in self.bridge_handles.drain(..) {
            let _ = handle.await;
        }

        for arc in self.interfaces.drain(..) {
            match Arc::try_unwrap(arc) {
                Ok(mut iface) => {
                    if let Err(e) = iface.stop().await {
                        warn!(interface = %iface.name(), "error stopping interface: {e}");
                    }
                }
                Err(arc) => {
                    warn!(interface = %arc.name(), "could not unwrap interface (still referenced)");
                }
            }
        }

        let (_transport, app) = self.flood.close();
        info!(
            delivered = app.delivered_count(),
            sent = app.sent_count(),
            dropped = app.dropped_count(),
            "node shutdown complete"
        );
    }
}

fn check_payload(payload: &[u8]) -> Result<(), NodeError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(payload_too_large(payload));
    }
    Ok(())
}

fn payload_too_large(payload: &[u8]) -> NodeError {
    NodeError::PayloadTooLarge {
        max: MAX_PAYLOAD_SIZE,
        actual: payload.len(),
    }
}

/// A random address that is neither the null address nor all ones.
fn random_address() -> LinkAddress {
    let mut rng = rand::thread_rng();
    loop {
        let bytes: [u8; 2] = rng.r#gen();
        if bytes != [0, 0] && bytes != [0xFF, 0xFF] {
            return LinkAddress::new(bytes);
        }
    }
}
