//! UDP interface implementation.
//!
//! Each datagram carries exactly one broadcast frame, so no stream framing
//! or reassembly is needed. With `broadcast` set the socket may send to a
//! subnet broadcast address; every node bound to the same port on that
//! subnet hears every frame, including its own.
//!
//! The link is lossy by nature: datagrams too short to hold a frame header
//! are discarded, and when the receive queue is full new datagrams are
//! dropped instead of stalling the socket.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::Deserialize;
use tokio::net::UdpSocket;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::error::{FrameError, InterfaceError};
use crate::framing::FRAME_HEADER_SIZE;
use crate::traits::Interface;

/// Largest datagram this interface sends.
pub const UDP_MTU: usize = 512;

/// Size of the receive buffer for `UdpSocket::recv_from`.
pub const UDP_RECV_BUFFER: usize = 2048;

/// Frames buffered between the read loop and `receive`.
const RX_QUEUE: usize = 256;

/// Configuration for a [`UdpInterface`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UdpConfig {
    /// Human-readable name for this interface.
    #[serde(default = "default_name")]
    pub name: String,
    /// Local address to bind the UDP socket to.
    pub bind_addr: SocketAddr,
    /// Where outgoing frames are sent (`None` for receive-only).
    #[serde(default)]
    pub target_addr: Option<SocketAddr>,
    /// Whether to enable `SO_BROADCAST` on the socket.
    #[serde(default = "default_true")]
    pub broadcast: bool,
    #[serde(default = "default_true")]
    pub can_transmit: bool,
    #[serde(default = "default_true")]
    pub can_receive: bool,
}

fn default_name() -> String {
    "udp".to_string()
}

fn default_true() -> bool {
    true
}

impl UdpConfig {
    /// Broadcast frames to `target_addr`, typically a subnet broadcast address.
    pub fn broadcast(
        name: impl Into<String>,
        bind_addr: SocketAddr,
        target_addr: SocketAddr,
    ) -> Self {
        Self {
            name: name.into(),
            bind_addr,
            target_addr: Some(target_addr),
            broadcast: true,
            can_transmit: true,
            can_receive: true,
        }
    }

    /// Send to a single peer. Useful on loopback where broadcast is unavailable.
    pub fn unicast(
        name: impl Into<String>,
        bind_addr: SocketAddr,
        target_addr: SocketAddr,
    ) -> Self {
        Self {
            broadcast: false,
            ..Self::broadcast(name, bind_addr, target_addr)
        }
    }

    /// Listen without ever transmitting.
    pub fn receive_only(name: impl Into<String>, bind_addr: SocketAddr) -> Self {
        Self {
            name: name.into(),
            bind_addr,
            target_addr: None,
            broadcast: false,
            can_transmit: false,
            can_receive: true,
        }
    }
}

/// A UDP network interface that sends and receives whole frames.
pub struct UdpInterface {
    config: UdpConfig,
    link: Option<Link>,
    frames_tx: mpsc::Sender<Vec<u8>>,
    frames_rx: Mutex<mpsc::Receiver<Vec<u8>>>,
}

/// Socket state that only exists between `start` and `stop`.
struct Link {
    socket: Arc<UdpSocket>,
    reader: Option<JoinHandle<()>>,
}

impl UdpInterface {
    pub fn new(config: UdpConfig) -> Self {
        let (frames_tx, frames_rx) = mpsc::channel(RX_QUEUE);
        Self {
            config,
            link: None,
            frames_tx,
            frames_rx: Mutex::new(frames_rx),
        }
    }

    /// Address the socket is bound to, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.link
            .as_ref()
            .and_then(|link| link.socket.local_addr().ok())
    }

    fn target(&self) -> Result<SocketAddr, InterfaceError> {
        if !self.config.can_transmit {
            return Err(InterfaceError::Configuration(
                "interface is receive-only".into(),
            ));
        }
        self.config
            .target_addr
            .ok_or_else(|| InterfaceError::Configuration("no target address configured".into()))
    }
}

async fn read_datagrams(socket: Arc<UdpSocket>, frames: mpsc::Sender<Vec<u8>>, name: String) {
    let mut buf = vec![0u8; UDP_RECV_BUFFER];

    loop {
        let (len, src) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                // ICMP unreachable and similar do not close a UDP socket
                warn!(interface = %name, "recv error: {e}");
                continue;
            }
        };

        if len < FRAME_HEADER_SIZE {
            debug!(interface = %name, %src, len, "runt datagram ignored");
            continue;
        }

        match frames.try_send(buf[..len].to_vec()) {
            Ok(()) => trace!(interface = %name, %src, len, "datagram received"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(interface = %name, %src, "receive queue full, datagram dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => break,
        }
    }
    debug!(interface = %name, "udp reader finished");
}

impl Interface for UdpInterface {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn mtu(&self) -> usize {
        UDP_MTU
    }

    fn can_receive(&self) -> bool {
        self.config.can_receive
    }

    fn can_transmit(&self) -> bool {
        self.config.can_transmit
    }

    fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    async fn start(&mut self) -> Result<(), InterfaceError> {
        if self.link.is_some() {
            return Err(InterfaceError::Configuration(
                "interface already started".into(),
            ));
        }

        let socket = UdpSocket::bind(self.config.bind_addr).await?;
        socket.set_broadcast(self.config.broadcast)?;
        let socket = Arc::new(socket);

        let reader = self.config.can_receive.then(|| {
            tokio::spawn(read_datagrams(
                Arc::clone(&socket),
                self.frames_tx.clone(),
                self.config.name.clone(),
            ))
        });

        info!(
            interface = %self.config.name,
            bound = %socket.local_addr().unwrap_or(self.config.bind_addr),
            target = ?self.config.target_addr,
            broadcast = self.config.broadcast,
            "udp interface started"
        );
        self.link = Some(Link { socket, reader });
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), InterfaceError> {
        let Some(link) = self.link.take() else {
            return Ok(());
        };

        if let Some(reader) = link.reader {
            reader.abort();
            let _ = reader.await;
        }
        info!(interface = %self.config.name, "udp interface stopped");
        Ok(())
    }

    async fn transmit(&self, data: &[u8]) -> Result<(), InterfaceError> {
        let link = self.link.as_ref().ok_or(InterfaceError::NotConnected)?;
        let target = self.target()?;

        if data.len() > UDP_MTU {
            return Err(FrameError::TooLarge {
                max: UDP_MTU,
                actual: data.len(),
            }
            .into());
        }

        let sent = link.socket.send_to(data, target).await?;
        if sent < data.len() {
            return Err(InterfaceError::TransmitFailed(format!(
                "datagram truncated to {sent} of {} bytes",
                data.len()
            )));
        }
        Ok(())
    }

    async fn receive(&self) -> Result<Vec<u8>, InterfaceError> {
        let mut frames = self.frames_rx.lock().await;
        frames.recv().await.ok_or(InterfaceError::Stopped)
    }
}
