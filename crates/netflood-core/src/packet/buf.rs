//! Shared packet buffer with reserved header room.
//!
//! A single buffer holds one packet at a time. The packet occupies
//! `storage[start..end]`: headers are pushed by moving `start` down into the
//! reserved room and stripped by moving it up, so neither operation copies
//! the payload.

extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::constants::{PACKETBUF_HDR_SIZE, PACKETBUF_SIZE};
use crate::error::PacketBufError;

/// The packet buffer shared between the flood layer, the transport, and the
/// application.
#[derive(Debug, Clone)]
pub struct PacketBuf {
    storage: Vec<u8>,
    hdr_room: usize,
    start: usize,
    end: usize,
}

impl PacketBuf {
    /// Buffer with the default header room and data capacity.
    pub fn new() -> Self {
        Self::with_capacity(PACKETBUF_HDR_SIZE, PACKETBUF_SIZE)
    }

    /// Buffer with `hdr_room` bytes reserved for headers and room for
    /// `data_size` bytes of data.
    pub fn with_capacity(hdr_room: usize, data_size: usize) -> Self {
        Self {
            storage: vec![0u8; hdr_room + data_size],
            hdr_room,
            start: hdr_room,
            end: hdr_room,
        }
    }

    /// Empty the buffer and restore the full header room.
    pub fn clear(&mut self) {
        self.start = self.hdr_room;
        self.end = self.hdr_room;
    }

    /// Replace the contents with `data`, placed after the header room.
    pub fn copy_from(&mut self, data: &[u8]) -> Result<(), PacketBufError> {
        let max = self.storage.len() - self.hdr_room;
        if data.len() > max {
            return Err(PacketBufError::DataTooLarge {
                max,
                actual: data.len(),
            });
        }
        self.start = self.hdr_room;
        self.end = self.hdr_room + data.len();
        self.storage[self.start..self.end].copy_from_slice(data);
        Ok(())
    }

    /// Reserve `size` zeroed bytes in front of the current contents.
    pub fn hdr_alloc(&mut self, size: usize) -> Result<(), PacketBufError> {
        if size > self.start {
            return Err(PacketBufError::NoHeaderSpace {
                requested: size,
                available: self.start,
            });
        }
        self.start -= size;
        self.storage[self.start..self.start + size].fill(0);
        Ok(())
    }

    /// Strip `size` bytes from the front of the current contents.
    pub fn hdr_reduce(&mut self, size: usize) -> Result<(), PacketBufError> {
        if size > self.len() {
            return Err(PacketBufError::ReduceTooLarge {
                requested: size,
                available: self.len(),
            });
        }
        self.start += size;
        Ok(())
    }

    /// Bytes still available for headers.
    pub fn header_room(&self) -> usize {
        self.start
    }

    /// The current contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.start..self.end]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Default for PacketBuf {
    fn default() -> Self {
        Self::new()
    }
}
