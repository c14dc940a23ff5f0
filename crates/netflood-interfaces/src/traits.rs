//! Core interface trait.

use crate::error::InterfaceError;

/// Default link MTU in bytes.
pub const DEFAULT_MTU: usize = 512;

/// Async trait implemented by all network interfaces.
///
/// The flood layer produces byte buffers rather than performing I/O itself;
/// interface implementations bridge those buffers to a real medium. Every
/// transmission is a broadcast to whichever nodes the medium reaches.
pub trait Interface: Send + Sync {
    /// Human-readable name for this interface (e.g. "udp[0.0.0.0:4300]").
    fn name(&self) -> &str;

    /// Largest frame the interface carries.
    fn mtu(&self) -> usize {
        DEFAULT_MTU
    }

    fn can_receive(&self) -> bool;

    fn can_transmit(&self) -> bool;

    /// Whether the interface is currently operational.
    fn is_connected(&self) -> bool;

    /// Bind sockets and spawn read loops.
    fn start(&mut self) -> impl Future<Output = Result<(), InterfaceError>> + Send;

    /// Stop the interface and release resources. Stopping twice is harmless.
    fn stop(&mut self) -> impl Future<Output = Result<(), InterfaceError>> + Send;

    /// Broadcast one frame.
    fn transmit(&self, data: &[u8]) -> impl Future<Output = Result<(), InterfaceError>> + Send;

    /// Wait for the next frame.
    fn receive(&self) -> impl Future<Output = Result<Vec<u8>, InterfaceError>> + Send;
}
