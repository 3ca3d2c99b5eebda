//! chunkpipe-core — file descriptors as lazy chunk streams.
//!
//! - **reader**: [`ChunkReader`] yields one chunk per OS `read`
//! - **writer**: [`ChunkWriter`] buffers pushed chunks and writes them out
//! - **source**: the [`ChunkSource`] / [`Flow`] iteration contract
//! - **fd**: [`FileHandle`] and the [`ReadFd`] / [`WriteFd`] seams
//! - **buffer**: fixed-capacity [`ByteBuffer`]
//! - **retry**: transparent retry of interrupted syscalls
//! - **config**: `chunkpipe.toml` parsing

pub mod buffer;
pub mod config;
pub mod error;
pub mod fd;
pub mod reader;
pub mod retry;
pub mod source;
pub mod writer;

pub use buffer::ByteBuffer;
pub use config::{PipeConfig, DEFAULT_BUFFER_SIZE};
pub use error::{PipeError, PipeResult};
pub use fd::{FileHandle, ReadFd, WriteFd};
pub use reader::ChunkReader;
pub use source::{from_chunks, ChunkSource, Flow, IterSource};
pub use writer::{ChunkWriter, WriteStats};
