//! Fan-out of committed bytes to the destination and its hash taps.

use std::io;

use dlpipe_verify::SharedHasher;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::state::ByteCounter;

/// Delivers every chunk to the destination, then to each hash tap in
/// registration order.
///
/// The destination is written first; if it fails, no tap sees the chunk.
/// Taps are shared hashers and are never reset, so a chain rebuilt for a
/// resumed attempt keeps accumulating the whole-file digest.
pub struct TransformChain<W> {
    sink: W,
    taps: Vec<SharedHasher>,
}

impl<W: AsyncWrite + Unpin> TransformChain<W> {
    pub fn new(sink: W, taps: Vec<SharedHasher>) -> Self { Self { sink, taps } }

    pub async fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.sink.write_all(chunk).await?;
        for tap in &self.taps {
            tap.update(chunk);
        }
        Ok(())
    }

    pub async fn flush(&mut self) -> io::Result<()> { self.sink.flush().await }

    pub fn into_inner(self) -> W { self.sink }
}

/// A [`TransformChain`] that counts what actually reached the destination.
///
/// The count is the authoritative resume offset and the value the progress
/// reporter reads.
pub struct TrackedChain<W> {
    chain:   TransformChain<W>,
    counter: ByteCounter,
}

impl<W: AsyncWrite + Unpin> TrackedChain<W> {
    pub fn new(chain: TransformChain<W>, counter: ByteCounter) -> Self { Self { chain, counter } }

    pub async fn write(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.chain.write(chunk).await?;
        self.counter.add(chunk.len() as u64);
        Ok(())
    }

    pub async fn flush(&mut self) -> io::Result<()> { self.chain.flush().await }

    pub fn committed(&self) -> u64 { self.counter.get() }

    pub fn into_inner(self) -> W { self.chain.into_inner() }
}
