//! Error types for the node orchestrator.

use netflood_interfaces::InterfaceError;
use netflood_transport::FloodError;

/// Errors that can occur during node operation.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("interface error: {0}")]
    Interface(#[from] InterfaceError),
    #[error("flood error: {0}")]
    Flood(#[from] FloodError),
    #[error("payload of {actual} bytes exceeds the {max}-byte flood limit")]
    PayloadTooLarge { max: usize, actual: usize },
    #[error("node already running")]
    AlreadyRunning,
    #[error("node stopped")]
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = NodeError::Config("bad address".into());
        assert_eq!(err.to_string(), "configuration error: bad address");
        assert_eq!(NodeError::AlreadyRunning.to_string(), "node already running");
        assert_eq!(NodeError::Stopped.to_string(), "node stopped");
        assert_eq!(
            NodeError::PayloadTooLarge { max: 124, actual: 125 }.to_string(),
            "payload of 125 bytes exceeds the 124-byte flood limit"
        );
    }

    #[test]
    fn test_from_flood_error() {
        let err: NodeError = FloodError::Config("history_size must be at least 1".into()).into();
        assert!(matches!(err, NodeError::Flood(_)));
        assert!(err.to_string().contains("history_size"));
    }
}
