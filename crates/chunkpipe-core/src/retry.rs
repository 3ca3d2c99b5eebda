//! Signal-interruption retry.

use std::io;

use tracing::trace;

/// Run `op` until it returns something other than `ErrorKind::Interrupted`.
///
/// Interruption is never surfaced to the caller. Any other error, and any
/// successful result, is returned as-is after the first attempt that
/// produced it.
pub fn retry_interrupted<T, F>(mut op: F) -> io::Result<T>
where
    F: FnMut() -> io::Result<T>,
{
    loop {
        match op() {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                trace!("syscall interrupted, retrying");
            }
            other => return other,
        }
    }
}
