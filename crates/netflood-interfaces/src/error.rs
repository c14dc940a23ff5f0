//! Error types for the interfaces layer.

/// A received frame could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("frame too short: need at least {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },
    #[error("frame too large: max {max} bytes, got {actual}")]
    TooLarge { max: usize, actual: usize },
}

/// Errors that can occur during interface operations.
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("framing error: {0}")]
    Framing(#[from] FrameError),
    #[error("interface not connected")]
    NotConnected,
    #[error("interface stopped")]
    Stopped,
    #[error("transmit failed: {0}")]
    TransmitFailed(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}
