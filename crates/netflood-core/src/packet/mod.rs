//! Flood header wire format, shared packet buffer, and packet snapshots.

pub mod buf;
pub mod header;
pub mod queuebuf;
