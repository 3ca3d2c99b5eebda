//! Error types for the chunk pipeline.

use std::io;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type PipeResult<T> = Result<T, PipeError>;

/// Errors that can occur while reading or writing chunks.
#[derive(Debug, Error)]
pub enum PipeError {
    /// An OS-level I/O failure. `context` names the failing call.
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("chunk reader buffer must have a non-zero capacity")]
    ZeroCapacity,

    #[error("chunk writer handle is already closed")]
    Closed,

    #[error("chunk writer failed on an earlier run; recover the handle with into_handle")]
    Failed,
}

impl PipeError {
    /// Wrap an `io::Error` with the name of the call that produced it.
    pub fn io(context: &'static str, source: io::Error) -> Self {
        PipeError::Io { context, source }
    }

    /// The underlying OS error code, if this is an I/O error that carries one.
    pub fn code(&self) -> Option<i32> {
        match self {
            PipeError::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    /// The failing call's context string, if this is an I/O error.
    pub fn context(&self) -> Option<&'static str> {
        match self {
            PipeError::Io { context, .. } => Some(context),
            _ => None,
        }
    }
}
