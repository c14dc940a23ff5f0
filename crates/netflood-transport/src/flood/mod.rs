//! Flood connections: origination, duplicate suppression, and bounded relay.
//!
//! A [`FloodConnection`] stamps outgoing payloads with the flood header,
//! decides for every received packet whether it is new, hands new packets to
//! the application, and relays them when the application asks and the hop
//! budget allows.

pub mod callbacks;
pub mod config;
pub mod connection;
pub mod constants;
pub mod types;

pub use callbacks::FloodCallbacks;
pub use config::{FloodConfig, HistoryPolicy};
pub use connection::FloodConnection;
pub use constants::*;
pub use types::{Delivery, RecvOutcome, RelayDecision};
