//! Core types, constants, and wire formats for netflood.
//!
//! This crate defines link addresses, the encoded flood sequence number and
//! its freshness test, the flood header wire format, and the shared packet
//! buffer with its snapshot pool.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod constants;
pub mod error;
pub mod packet;
pub mod seqno;
pub mod types;

pub use error::{InvalidLength, PacketBufError, PacketError, ParseAddressError};
pub use packet::buf::PacketBuf;
pub use packet::header::FloodHeader;
pub use packet::queuebuf::{QueueBuf, QueueBufPool};
pub use seqno::{EncodedSeqno, is_fresh};
pub use types::{Channel, LinkAddress};
