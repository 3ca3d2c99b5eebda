//! ChunkWriter — the terminal pipeline stage that persists chunks to a
//! file descriptor.
//!
//! Chunks are copied into an optional fixed-capacity buffer and written out
//! when it cannot take the next one. A chunk at least as large as the whole
//! buffer skips the copy and is written directly, after whatever was already
//! buffered.
//!
//! ```text
//! chunk v arrives
//!   → no buffer, or |v| ≥ capacity → flush; write(v)
//!   → |v| > tailroom               → flush; append(v)
//!   → otherwise                    → append(v)
//! source exhausted → flush; close(fd)
//! ```
//!
//! On any error the descriptor is left open and unflushed data stays in the
//! buffer. The writer refuses further runs after that; recover the handle
//! with [`ChunkWriter::into_handle`].

use std::io;

use serde::Serialize;
use tracing::{debug, trace};

use crate::buffer::ByteBuffer;
use crate::error::{PipeError, PipeResult};
use crate::fd::{FileHandle, WriteFd};
use crate::retry::retry_interrupted;
use crate::source::{ChunkSource, Flow};

/// Counters collected over one [`ChunkWriter::consume`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WriteStats {
    /// Chunks received from the source.
    pub chunks: u64,
    /// Bytes received from the source.
    pub bytes: u64,
    /// Successful `write` syscalls (interrupted attempts are not counted).
    pub write_calls: u64,
    /// Buffer flushes that wrote data.
    pub flushes: u64,
    /// Chunks written directly, bypassing the buffer.
    pub bypassed: u64,
}

/// Buffered writer that drives a [`ChunkSource`] to completion.
///
/// A `write` that accepts zero bytes of a non-empty chunk is reported as an
/// `ErrorKind::WriteZero` I/O error rather than retried.
#[derive(Debug)]
pub struct ChunkWriter<H: WriteFd = FileHandle> {
    /// `None` once the handle has been closed.
    handle: Option<H>,
    /// `None` means unbuffered.
    buffer: Option<ByteBuffer>,
    stats: WriteStats,
    /// Set when a run returned an error; the buffer no longer matches the file.
    failed: bool,
}

impl<H: WriteFd> ChunkWriter<H> {
    pub fn new(handle: H, buffer: Option<ByteBuffer>) -> Self {
        let buffer = buffer.map(|mut buf| {
            buf.clear();
            buf
        });
        Self {
            handle: Some(handle),
            buffer,
            stats: WriteStats::default(),
            failed: false,
        }
    }

    /// Writer with a freshly allocated buffer of `capacity` bytes.
    pub fn with_capacity(handle: H, capacity: usize) -> Self {
        Self::new(handle, Some(ByteBuffer::with_capacity(capacity)))
    }

    /// Writer that issues a write for every chunk.
    pub fn unbuffered(handle: H) -> Self {
        Self::new(handle, None)
    }

    /// Buffer capacity, or `None` when unbuffered.
    pub fn capacity(&self) -> Option<usize> {
        self.buffer.as_ref().map(ByteBuffer::capacity)
    }

    /// Bytes currently held in the buffer and not yet written.
    pub fn buffered_len(&self) -> usize {
        self.buffer.as_ref().map_or(0, ByteBuffer::len)
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    /// Whether an earlier [`consume`](Self::consume) returned an error.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Give back the handle if it has not been closed.
    pub fn into_handle(self) -> Option<H> {
        self.handle
    }

    /// Drive `source` until it is exhausted, writing every chunk, then flush
    /// and close the handle.
    ///
    /// The handle is closed only when this returns `Ok`. A source that stops
    /// itself early counts as exhausted. A writer runs at most once: later
    /// calls return [`PipeError::Closed`] after success and
    /// [`PipeError::Failed`] after an error.
    pub fn consume<S: ChunkSource>(&mut self, source: S) -> PipeResult<WriteStats> {
        if self.failed {
            return Err(PipeError::Failed);
        }
        if self.handle.is_none() {
            return Err(PipeError::Closed);
        }

        let result = self.run(source);
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn run<S: ChunkSource>(&mut self, mut source: S) -> PipeResult<WriteStats> {
        source.drive(|chunk| {
            self.push(chunk)?;
            Ok(Flow::Continue)
        })?;

        self.flush()?;

        let handle = self.handle.take().ok_or(PipeError::Closed)?;
        handle
            .close()
            .map_err(|e| PipeError::io("close() failed", e))?;

        debug!(
            chunks = self.stats.chunks,
            bytes = self.stats.bytes,
            write_calls = self.stats.write_calls,
            flushes = self.stats.flushes,
            bypassed = self.stats.bypassed,
            "chunk writer finished and closed handle"
        );
        Ok(self.stats)
    }

    fn push(&mut self, chunk: &[u8]) -> PipeResult<()> {
        self.stats.chunks += 1;
        self.stats.bytes += chunk.len() as u64;

        let bypass = self
            .buffer
            .as_ref()
            .is_none_or(|buf| chunk.len() >= buf.capacity());
        if bypass {
            self.flush()?;
            let handle = self.handle.as_mut().ok_or(PipeError::Closed)?;
            write_direct(handle, chunk, &mut self.stats)?;
            self.stats.bypassed += 1;
            trace!(bytes = chunk.len(), "wrote chunk directly");
            return Ok(());
        }

        if self
            .buffer
            .as_ref()
            .is_some_and(|buf| chunk.len() > buf.tailroom())
        {
            self.flush()?;
        }

        if let Some(buf) = self.buffer.as_mut() {
            buf.extend_from_slice(chunk);
            trace!(bytes = chunk.len(), buffered = buf.len(), "buffered chunk");
        }
        Ok(())
    }

    fn flush(&mut self) -> PipeResult<()> {
        let Some(buf) = self.buffer.as_mut() else {
            return Ok(());
        };
        if buf.is_empty() {
            return Ok(());
        }

        let handle = self.handle.as_mut().ok_or(PipeError::Closed)?;
        write_direct(handle, buf.data(), &mut self.stats)?;
        debug!(bytes = buf.len(), "flushed write buffer");
        buf.clear();
        self.stats.flushes += 1;
        Ok(())
    }
}

/// Write all of `data`, looping over short writes and retrying interruptions.
fn write_direct<H: WriteFd>(
    handle: &mut H,
    mut data: &[u8],
    stats: &mut WriteStats,
) -> PipeResult<()> {
    while !data.is_empty() {
        let n = retry_interrupted(|| handle.write(data))
            .map_err(|e| PipeError::io("write() failed", e))?;
        if n == 0 {
            return Err(PipeError::io(
                "write() failed",
                io::Error::from(io::ErrorKind::WriteZero),
            ));
        }
        stats.write_calls += 1;
        if n < data.len() {
            trace!(written = n, remaining = data.len() - n, "short write");
        }
        data = &data[n..];
    }
    Ok(())
}
