//! Unified enum wrapping all concrete interface types for static dispatch.

use netflood_interfaces::{Interface, InterfaceError, MemoryInterface, UdpInterface};

/// Wraps all concrete interface types, dispatching trait methods via match.
pub enum AnyInterface {
    Udp(UdpInterface),
    Memory(MemoryInterface),
}

/// Delegate a sync method that returns a concrete (non-opaque) type.
macro_rules! delegate_sync {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            Self::Udp(i) => i.$method($($arg),*),
            Self::Memory(i) => i.$method($($arg),*),
        }
    };
}

/// Delegate an async trait method.
macro_rules! delegate_async {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            Self::Udp(i) => i.$method($($arg),*).await,
            Self::Memory(i) => i.$method($($arg),*).await,
        }
    };
}

impl AnyInterface {
    pub fn name(&self) -> &str {
        delegate_sync!(self, name)
    }

    pub fn mtu(&self) -> usize {
        delegate_sync!(self, mtu)
    }

    pub fn can_receive(&self) -> bool {
        delegate_sync!(self, can_receive)
    }

    pub fn can_transmit(&self) -> bool {
        delegate_sync!(self, can_transmit)
    }

    pub async fn start(&mut self) -> Result<(), InterfaceError> {
        delegate_async!(self, start)
    }

    pub async fn stop(&mut self) -> Result<(), InterfaceError> {
        delegate_async!(self, stop)
    }

    pub async fn transmit(&self, data: &[u8]) -> Result<(), InterfaceError> {
        delegate_async!(self, transmit, data)
    }

    pub async fn receive(&self) -> Result<Vec<u8>, InterfaceError> {
        delegate_async!(self, receive)
    }
}

impl From<UdpInterface> for AnyInterface {
    fn from(iface: UdpInterface) -> Self {
        Self::Udp(iface)
    }
}

impl From<MemoryInterface> for AnyInterface {
    fn from(iface: MemoryInterface) -> Self {
        Self::Memory(iface)
    }
}
