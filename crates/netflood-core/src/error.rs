//! Error types for the netflood-core crate.

extern crate alloc;
use alloc::string::String;
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketError {
    TooShort { min: usize, actual: usize },
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::TooShort { min, actual } => {
                write!(
                    f,
                    "packet too short: need at least {min} bytes, got {actual}"
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PacketError {}

/// Errors from the shared packet buffer primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketBufError {
    NoHeaderSpace { requested: usize, available: usize },
    DataTooLarge { max: usize, actual: usize },
    ReduceTooLarge { requested: usize, available: usize },
}

impl fmt::Display for PacketBufError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketBufError::NoHeaderSpace {
                requested,
                available,
            } => write!(
                f,
                "no header space: requested {requested} bytes, {available} available"
            ),
            PacketBufError::DataTooLarge { max, actual } => {
                write!(f, "data too large: max {max} bytes, got {actual}")
            }
            PacketBufError::ReduceTooLarge {
                requested,
                available,
            } => write!(
                f,
                "cannot strip {requested} bytes from a {available} byte packet"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PacketBufError {}

/// A byte slice had the wrong length for a fixed-width type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLength {
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for InvalidLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid length: expected {}, got {}",
            self.expected, self.actual
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidLength {}

/// A textual link address was not of the form `a.b` with byte-sized parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAddressError {
    pub input: String,
}

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid link address: {:?}", self.input)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseAddressError {}
