//! Flood layer error types.

use netflood_core::error::{PacketBufError, PacketError};

/// Errors returned by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("transport not open")]
    NotOpen,

    #[error("transport already open on channel {0}")]
    AlreadyOpen(u16),

    #[error("send rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FloodError {
    #[error("cannot reserve flood header: {0}")]
    NoHeaderSpace(PacketBufError),

    #[error("packet error: {0}")]
    Packet(#[from] PacketError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
