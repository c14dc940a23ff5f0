//! Link-layer addressing and channel identifiers.
//!
//! Addresses are compared by value only; the flood layer never interprets
//! their contents.

extern crate alloc;

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use crate::constants::LINKADDR_SIZE;
use crate::error::{InvalidLength, ParseAddressError};

/// A fixed-width link-layer node address.
///
/// Rendered and parsed in dotted byte notation, e.g. `1.0`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[must_use]
pub struct LinkAddress([u8; LINKADDR_SIZE]);

impl LinkAddress {
    /// The all-zero address.
    pub const NULL: LinkAddress = LinkAddress([0; LINKADDR_SIZE]);

    pub const fn new(bytes: [u8; LINKADDR_SIZE]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; LINKADDR_SIZE] {
        self.0
    }
}

impl AsRef<[u8]> for LinkAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; LINKADDR_SIZE]> for LinkAddress {
    fn from(bytes: [u8; LINKADDR_SIZE]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for LinkAddress {
    type Error = InvalidLength;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; LINKADDR_SIZE] = bytes.try_into().map_err(|_| InvalidLength {
            expected: LINKADDR_SIZE,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }
}

impl FromStr for LinkAddress {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAddressError {
            input: s.to_string(),
        };
        let mut bytes = [0u8; LINKADDR_SIZE];
        let mut parts = s.split('.');
        for byte in &mut bytes {
            let part = parts.next().ok_or_else(err)?;
            *byte = part.parse::<u8>().map_err(|_| err())?;
        }
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self(bytes))
    }
}

impl fmt::Display for LinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0[0], self.0[1])
    }
}

impl fmt::Debug for LinkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LinkAddress({self})")
    }
}

/// Broadcast channel a flood connection is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Channel(pub u16);

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
