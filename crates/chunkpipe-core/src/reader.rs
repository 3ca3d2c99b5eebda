//! ChunkReader — a file descriptor as a lazy sequence of byte chunks.
//!
//! Every chunk is the result of exactly one OS `read` into a single reusable
//! buffer. The chunk handed to the sink borrows that buffer, so the next
//! read overwrites it.
//!
//! ```text
//! drive(sink)
//!   loop:
//!     read(fd, buf[..capacity])   (retried on EINTR)
//!       → error → Err(Io "read failed")
//!       → 0     → Ok(Continue)    end of stream
//!       → n     → sink(&buf[..n])
//!                   → Stop     → Ok(Stop), no further reads
//!                   → Continue → next read
//! ```

use tracing::{debug, trace};

use crate::buffer::ByteBuffer;
use crate::error::{PipeError, PipeResult};
use crate::fd::{FileHandle, ReadFd};
use crate::retry::retry_interrupted;
use crate::source::{ChunkSource, Flow};

/// Reads a descriptor one buffer-sized chunk at a time.
///
/// The handle is never closed explicitly; it is released when the reader is
/// dropped, or handed back by [`ChunkReader::into_handle`].
#[derive(Debug)]
pub struct ChunkReader<H: ReadFd = FileHandle> {
    handle: H,
    buffer: ByteBuffer,
    chunks_read: u64,
    bytes_read: u64,
}

impl<H: ReadFd> ChunkReader<H> {
    /// Create a reader over `handle` using `buffer` for every read.
    ///
    /// Returns [`PipeError::ZeroCapacity`] for a zero-capacity buffer, which
    /// could never read anything.
    pub fn new(handle: H, mut buffer: ByteBuffer) -> PipeResult<Self> {
        if buffer.capacity() == 0 {
            return Err(PipeError::ZeroCapacity);
        }
        buffer.clear();
        Ok(Self {
            handle,
            buffer,
            chunks_read: 0,
            bytes_read: 0,
        })
    }

    /// Create a reader with a freshly allocated buffer of `capacity` bytes.
    pub fn with_capacity(handle: H, capacity: usize) -> PipeResult<Self> {
        Self::new(handle, ByteBuffer::with_capacity(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Chunks handed to sinks so far.
    pub fn chunks_read(&self) -> u64 {
        self.chunks_read
    }

    /// Bytes handed to sinks so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_handle(self) -> H {
        self.handle
    }

    fn read_chunk(&mut self) -> PipeResult<usize> {
        let handle = &mut self.handle;
        let tail = self.buffer.writable_tail();
        retry_interrupted(|| handle.read(tail)).map_err(|e| PipeError::io("read failed", e))
    }
}

impl<H: ReadFd> ChunkSource for ChunkReader<H> {
    fn drive<F>(&mut self, mut sink: F) -> PipeResult<Flow>
    where
        F: FnMut(&[u8]) -> PipeResult<Flow>,
    {
        loop {
            let n = self.read_chunk()?;
            if n == 0 {
                debug!(
                    chunks = self.chunks_read,
                    bytes = self.bytes_read,
                    "chunk reader reached end of stream"
                );
                return Ok(Flow::Continue);
            }

            self.chunks_read += 1;
            self.bytes_read += n as u64;
            trace!(bytes = n, chunk = self.chunks_read, "read chunk");

            if sink(&self.buffer.tail()[..n])?.is_stop() {
                debug!(
                    chunks = self.chunks_read,
                    bytes = self.bytes_read,
                    "chunk reader stopped by sink"
                );
                return Ok(Flow::Stop);
            }
        }
    }
}
