//! Network interfaces for the netflood stack.
//!
//! The flood layer is sans-IO; this crate moves its packets across real
//! links. [`framing`] adds the link header every broadcast frame carries,
//! [`udp`] sends frames as UDP datagrams, and [`memory`] connects interfaces
//! inside one process.

pub mod error;
pub mod framing;
pub mod memory;
pub mod testing;
pub mod traits;
pub mod udp;

pub use error::{FrameError, InterfaceError};
pub use framing::BroadcastFrame;
pub use memory::{MemoryInterface, MemoryMedium};
pub use traits::Interface;
pub use udp::{UdpConfig, UdpInterface};
