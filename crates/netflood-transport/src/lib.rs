//! Flooding layer for the netflood stack.
//!
//! This crate handles duplicate suppression through the per-originator
//! history cache, origination and bounded relay through
//! [`FloodConnection`](flood::FloodConnection), and the polite broadcast
//! transport that schedules the actual transmissions.

pub mod error;
pub mod flood;
pub mod history;
pub mod polite;
pub mod testing;
pub mod transport;

pub use error::{FloodError, TransportError};
pub use flood::{
    Delivery, FloodCallbacks, FloodConfig, FloodConnection, HistoryPolicy, RecvOutcome,
    RelayDecision,
};
pub use history::{HistoryCache, HistoryEntry};
pub use polite::{PoliteAction, PoliteBroadcast, PoliteConfig};
pub use transport::{SendQuality, Transport};
