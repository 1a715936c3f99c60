use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Monotonic count of bytes committed to the destination.
///
/// Cloned handles observe the same counter; only the transfer loop adds to it.
#[derive(Debug, Clone, Default)]
pub struct ByteCounter(Arc<AtomicU64>);

impl ByteCounter {
    pub fn get(&self) -> u64 { self.0.load(Ordering::Acquire) }

    pub(crate) fn add(&self, bytes: u64) { self.0.fetch_add(bytes, Ordering::AcqRel); }
}

/// Total resource length, fixed by the first response that declares one.
#[derive(Debug, Clone, Default)]
pub struct ContentLength(Arc<OnceLock<u64>>);

impl ContentLength {
    pub fn get(&self) -> Option<u64> { self.0.get().copied() }

    /// Record the length unless one is already known. Returns the length that
    /// is in effect afterwards.
    pub(crate) fn record(&self, length: u64) -> u64 { *self.0.get_or_init(|| length) }
}
