//! Polite broadcast: delayed single-slot transmission that gives up when
//! enough neighbors are heard sending the same packet.
//!
//! [`PoliteBroadcast`] is sans-IO. The caller feeds it the current time
//! through [`poll`](PoliteBroadcast::poll), reports every packet heard on the
//! channel through [`overheard`](PoliteBroadcast::overheard), and performs the
//! [`PoliteAction`]s it returns.

pub mod broadcast;
pub mod config;
pub mod constants;

pub use broadcast::{PoliteAction, PoliteBroadcast};
pub use config::PoliteConfig;
pub use constants::*;
