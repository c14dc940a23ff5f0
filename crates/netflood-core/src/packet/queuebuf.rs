//! Packet snapshots drawn from a bounded pool.
//!
//! A [`QueueBuf`] is an owned copy of a packet's bytes. Each live snapshot
//! holds one slot of its [`QueueBufPool`]; the slot is returned when the
//! snapshot is dropped, so release happens exactly once on every path.
//!
//! Processing is run-to-completion, but the connection owning a pool is moved
//! between worker threads of a multi-threaded runtime, so the slot count is
//! atomic and both types are `Send + Sync`.

extern crate alloc;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::constants::QUEUEBUF_NUM;
use crate::error::PacketBufError;
use crate::packet::buf::PacketBuf;

/// Bounded pool of packet snapshots.
///
/// Cloning yields another handle to the same pool.
#[derive(Debug, Clone)]
pub struct QueueBufPool {
    inner: Arc<PoolInner>,
}

#[derive(Debug)]
struct PoolInner {
    capacity: usize,
    in_use: AtomicUsize,
}

impl QueueBufPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                capacity,
                in_use: AtomicUsize::new(0),
            }),
        }
    }

    /// Copy the current contents of `buf` into a new snapshot.
    ///
    /// Returns `None` when every slot is taken.
    pub fn snapshot(&self, buf: &PacketBuf) -> Option<QueueBuf> {
        self.inner
            .in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.inner.capacity).then_some(n + 1)
            })
            .ok()?;

        Some(QueueBuf {
            bytes: buf.as_slice().to_vec(),
            pool: Arc::clone(&self.inner),
        })
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Number of snapshots currently alive.
    pub fn in_use(&self) -> usize {
        self.inner.in_use.load(Ordering::Acquire)
    }

    pub fn available(&self) -> usize {
        self.capacity().saturating_sub(self.in_use())
    }
}

impl Default for QueueBufPool {
    fn default() -> Self {
        Self::new(QUEUEBUF_NUM)
    }
}

/// An owned copy of a packet, holding one pool slot until dropped.
#[derive(Debug)]
pub struct QueueBuf {
    bytes: Vec<u8>,
    pool: Arc<PoolInner>,
}

impl QueueBuf {
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Copy the snapshot back into `buf` and release the slot.
    pub fn restore(self, buf: &mut PacketBuf) -> Result<(), PacketBufError> {
        buf.copy_from(&self.bytes)
    }
}

impl Drop for QueueBuf {
    fn drop(&mut self) {
        self.pool.in_use.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf_with(data: &[u8]) -> PacketBuf {
        let mut buf = PacketBuf::new();
        buf.copy_from(data).unwrap();
        buf
    }

    #[test]
    fn test_pool_and_snapshot_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueueBufPool>();
        assert_send_sync::<QueueBuf>();
    }

    #[test]
    fn test_snapshot_released_on_another_thread() {
        let pool = QueueBufPool::new(1);
        let snapshot = pool.snapshot(&buf_with(b"moved")).unwrap();
        assert_eq!(pool.available(), 0);
        std::thread::spawn(move || drop(snapshot)).join().unwrap();
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_snapshot_copies_contents() {
        let pool = QueueBufPool::new(2);
        let buf = buf_with(b"packet");
        let snap = pool.snapshot(&buf).unwrap();
        assert_eq!(snap.as_slice(), b"packet");
        assert_eq!(pool.in_use(), 1);
    }

    #[test]
    fn test_exhausted_pool_returns_none() {
        let pool = QueueBufPool::new(1);
        let buf = buf_with(b"a");
        let _held = pool.snapshot(&buf).unwrap();
        assert!(pool.snapshot(&buf).is_none());
        assert_eq!(pool.in_use(), 1);
    }

    #[test]
    fn test_drop_releases_slot() {
        let pool = QueueBufPool::new(1);
        let buf = buf_with(b"a");
        let snap = pool.snapshot(&buf).unwrap();
        drop(snap);
        assert_eq!(pool.in_use(), 0);
        assert!(pool.snapshot(&buf).is_some());
    }

    #[test]
    fn test_restore_undoes_mutation_and_releases() {
        let pool = QueueBufPool::new(1);
        let mut buf = buf_with(b"original");
        let snap = pool.snapshot(&buf).unwrap();

        buf.hdr_reduce(4).unwrap();
        buf.copy_from(b"overwritten by app").unwrap();

        snap.restore(&mut buf).unwrap();
        assert_eq!(buf.as_slice(), b"original");
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn test_cloned_handles_share_slots() {
        let pool = QueueBufPool::new(1);
        let other = pool.clone();
        let buf = buf_with(b"a");
        let _held = pool.snapshot(&buf).unwrap();
        assert_eq!(other.available(), 0);
        assert!(other.snapshot(&buf).is_none());
    }
}
