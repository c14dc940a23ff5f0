//! Node orchestration for the netflood stack.
//!
//! Ties a [`FloodConnection`](netflood_transport::FloodConnection) over a
//! polite broadcast transport to real interfaces, with TOML configuration
//! and structured logging.

pub mod app;
pub mod config;
pub mod error;
pub mod interface_enum;
pub mod logging;
pub mod node;

pub use app::{DeliveredMessage, NodeApp};
pub use config::NodeConfig;
pub use error::NodeError;
pub use interface_enum::AnyInterface;
pub use node::{Node, OriginateHandle, ShutdownHandle};
