//! In-process broadcast medium.
//!
//! A [`MemoryMedium`] stands in for a shared radio channel: every frame one
//! attached [`MemoryInterface`] transmits reaches all other started
//! interfaces on the same medium. Used to run several nodes in one process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::{Mutex, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::InterfaceError;
use crate::traits::Interface;

const MEDIUM_CAPACITY: usize = 1024;
const RX_QUEUE: usize = 256;

#[derive(Debug, Clone)]
struct Transmission {
    from: usize,
    frame: Vec<u8>,
}

/// Shared medium that memory interfaces attach to.
#[derive(Clone)]
pub struct MemoryMedium {
    tx: broadcast::Sender<Transmission>,
    next_id: Arc<AtomicUsize>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(MEDIUM_CAPACITY);
        Self {
            tx,
            next_id: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a new interface on this medium.
    pub fn attach(&self, name: impl Into<String>) -> MemoryInterface {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (rx_sender, rx_receiver) = mpsc::channel(RX_QUEUE);
        let (stop_tx, stop_rx) = watch::channel(false);
        MemoryInterface {
            name: name.into(),
            id,
            medium: self.tx.clone(),
            rx_receiver: Mutex::new(rx_receiver),
            rx_sender,
            online: AtomicBool::new(false),
            stop_tx,
            stop_rx,
            task_handle: Mutex::new(None),
        }
    }
}

impl Default for MemoryMedium {
    fn default() -> Self {
        Self::new()
    }
}

/// One node's attachment to a [`MemoryMedium`]. Never hears its own frames.
pub struct MemoryInterface {
    name: String,
    id: usize,
    medium: broadcast::Sender<Transmission>,
    rx_receiver: Mutex<mpsc::Receiver<Vec<u8>>>,
    rx_sender: mpsc::Sender<Vec<u8>>,
    online: AtomicBool,
    stop_tx: watch::Sender<bool>,
    stop_rx: watch::Receiver<bool>,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl MemoryInterface {
    async fn read_loop(
        id: usize,
        mut medium: broadcast::Receiver<Transmission>,
        tx: mpsc::Sender<Vec<u8>>,
        mut stop_rx: watch::Receiver<bool>,
        name: String,
    ) {
        loop {
            tokio::select! {
                result = medium.recv() => {
                    match result {
                        Ok(t) if t.from == id => {}
                        Ok(t) => {
                            if tx.send(t.frame).await.is_err() {
                                return;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!(interface = %name, missed = n, "receiver lagged, frames lost");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = stop_rx.changed() => break,
            }
        }
        debug!(interface = %name, "memory read loop finished");
    }
}

impl Interface for MemoryInterface {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_receive(&self) -> bool {
        true
    }

    fn can_transmit(&self) -> bool {
        true
    }

    fn is_connected(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    async fn start(&mut self) -> Result<(), InterfaceError> {
        let medium = self.medium.subscribe();
        let tx = self.rx_sender.clone();
        let stop_rx = self.stop_rx.clone();
        let name = self.name.clone();
        let id = self.id;

        let handle = tokio::spawn(async move {
            Self::read_loop(id, medium, tx, stop_rx, name).await;
        });
        *self.task_handle.lock().await = Some(handle);
        self.online.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), InterfaceError> {
        let _ = self.stop_tx.send(true);
        self.online.store(false, Ordering::SeqCst);
        let handle = self.task_handle.lock().await.take();
        if let Some(h) = handle {
            let _ = h.await;
        }
        Ok(())
    }

    async fn transmit(&self, data: &[u8]) -> Result<(), InterfaceError> {
        if !self.online.load(Ordering::SeqCst) {
            return Err(InterfaceError::NotConnected);
        }
        // No receivers is not an error: nobody is in range
        let _ = self.medium.send(Transmission {
            from: self.id,
            frame: data.to_vec(),
        });
        Ok(())
    }

    async fn receive(&self) -> Result<Vec<u8>, InterfaceError> {
        let mut rx = self.rx_receiver.lock().await;
        rx.recv().await.ok_or(InterfaceError::Stopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use std::time::Duration;

    async fn recv(iface: &MemoryInterface) -> Vec<u8> {
        tokio::time::timeout(Duration::from_secs(2), iface.receive())
            .await
            .expect("timed out waiting for frame")
            .unwrap()
    }

    #[tokio::test]
    async fn frames_reach_every_other_interface() {
        let medium = MemoryMedium::new();
        let mut a = medium.attach("mem-a");
        let mut b = medium.attach("mem-b");
        let mut c = medium.attach("mem-c");
        a.start().await.unwrap();
        b.start().await.unwrap();
        c.start().await.unwrap();

        a.transmit(b"from a").await.unwrap();
        assert_eq!(recv(&b).await, b"from a");
        assert_eq!(recv(&c).await, b"from a");

        // a does not hear itself, so the next frame it sees is from b
        b.transmit(b"from b").await.unwrap();
        assert_eq!(recv(&a).await, b"from b");

        a.stop().await.unwrap();
        b.stop().await.unwrap();
        c.stop().await.unwrap();
    }

    #[tokio::test]
    async fn conformance() {
        let medium = MemoryMedium::new();
        let mut iface = medium.attach("mem");
        testing::assert_pre_start_conformance(&iface).await;
        testing::assert_capabilities_consistent(&iface);
        iface.start().await.unwrap();
        assert!(iface.is_connected());
        testing::assert_stop_conformance(&mut iface).await;
    }

    #[tokio::test]
    async fn transmit_without_listeners_succeeds() {
        let medium = MemoryMedium::new();
        let mut lonely = medium.attach("mem-lonely");
        lonely.start().await.unwrap();
        lonely.transmit(b"anyone?").await.unwrap();
        lonely.stop().await.unwrap();
    }
}
