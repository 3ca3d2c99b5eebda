//! Owned file descriptors and the read/write seams the pipeline runs over.
//!
//! [`ChunkReader`](crate::reader::ChunkReader) and
//! [`ChunkWriter`](crate::writer::ChunkWriter) never touch `std::fs::File`
//! directly. They talk to a [`ReadFd`] / [`WriteFd`], which [`FileHandle`]
//! implements with exactly one syscall per call. Tests substitute scripted
//! descriptors to simulate short reads, short writes and interruptions.

use std::fs::File;
use std::io::{self, Read, Write};
#[cfg(unix)]
use std::os::fd::{AsRawFd, IntoRawFd, OwnedFd, RawFd};

/// A descriptor that can be read from, one OS `read` per call.
pub trait ReadFd {
    /// Read up to `buf.len()` bytes. `Ok(0)` means end of stream.
    ///
    /// Implementations must not retry on `ErrorKind::Interrupted`; the caller
    /// owns the retry policy.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// A descriptor that can be written to, one OS `write` per call, and closed.
pub trait WriteFd {
    /// Write some prefix of `buf`, returning how many bytes were accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Close the descriptor, reporting any error from the close itself.
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

/// An owned, open OS file with exclusive-close semantics.
///
/// Dropping a `FileHandle` closes the descriptor and discards any close
/// error. Call [`WriteFd::close`] to observe it.
#[derive(Debug)]
pub struct FileHandle {
    file: File,
}

impl FileHandle {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    /// Take ownership of an already-open descriptor.
    #[cfg(unix)]
    pub fn from_fd(fd: OwnedFd) -> Self {
        Self {
            file: File::from(fd),
        }
    }

    pub fn as_file(&self) -> &File {
        &self.file
    }

    pub fn into_file(self) -> File {
        self.file
    }
}

impl From<File> for FileHandle {
    fn from(file: File) -> Self {
        Self::new(file)
    }
}

#[cfg(unix)]
impl From<OwnedFd> for FileHandle {
    fn from(fd: OwnedFd) -> Self {
        Self::from_fd(fd)
    }
}

#[cfg(unix)]
impl AsRawFd for FileHandle {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl ReadFd for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(&mut self.file, buf)
    }
}

impl WriteFd for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(&mut self.file, buf)
    }

    #[cfg(unix)]
    fn close(self) -> io::Result<()> {
        let fd = self.file.into_raw_fd();
        // SAFETY: `fd` was just released from an owned `File`; nothing else
        // holds it, so this is the only close.
        let rc = unsafe { libc::close(fd) };
        if rc == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn close(self) -> io::Result<()> {
        drop(self.file);
        Ok(())
    }
}
