//! The iteration contract between chunk producers and consumers.
//!
//! A [`ChunkSource`] is anything that can be driven with a sink until it is
//! exhausted or the sink asks it to stop. The sink sees each chunk as a
//! borrowed `&[u8]` that is only valid for the duration of that call.
//!
//! ```text
//! source.drive(|chunk| {
//!     ...               // inspect / forward chunk
//!     Ok(Flow::Continue) // or Ok(Flow::Stop), or Err(..) to abort
//! })
//!   → Ok(Flow::Continue)  source exhausted
//!   → Ok(Flow::Stop)      sink stopped it early
//!   → Err(..)             I/O error in the source, or error from the sink
//! ```

use crate::error::PipeResult;

/// Whether a sink wants more chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Flow {
    #[default]
    Continue,
    Stop,
}

impl Flow {
    pub fn is_stop(self) -> bool {
        matches!(self, Flow::Stop)
    }
}

/// A producer of byte chunks that can be driven to completion.
pub trait ChunkSource {
    /// Feed chunks to `sink` in order until the source is exhausted
    /// (`Ok(Flow::Continue)`) or the sink returns `Flow::Stop`
    /// (`Ok(Flow::Stop)`). Errors from the sink are propagated unchanged.
    fn drive<F>(&mut self, sink: F) -> PipeResult<Flow>
    where
        F: FnMut(&[u8]) -> PipeResult<Flow>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    fn drive<F>(&mut self, sink: F) -> PipeResult<Flow>
    where
        F: FnMut(&[u8]) -> PipeResult<Flow>,
    {
        (**self).drive(sink)
    }
}

/// An in-memory chunk source over any iterator of byte slices.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: I,
}

impl<I> ChunkSource for IterSource<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    fn drive<F>(&mut self, mut sink: F) -> PipeResult<Flow>
    where
        F: FnMut(&[u8]) -> PipeResult<Flow>,
    {
        for chunk in self.iter.by_ref() {
            if sink(chunk.as_ref())?.is_stop() {
                return Ok(Flow::Stop);
            }
        }
        Ok(Flow::Continue)
    }
}

/// Build an [`IterSource`] from anything iterable over byte-slice-likes.
pub fn from_chunks<T>(chunks: T) -> IterSource<T::IntoIter>
where
    T: IntoIterator,
    T::Item: AsRef<[u8]>,
{
    IterSource {
        iter: chunks.into_iter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipeError;

    fn collect(source: &mut impl ChunkSource) -> (Flow, Vec<Vec<u8>>) {
        let mut seen = Vec::new();
        let flow = source
            .drive(|chunk| {
                seen.push(chunk.to_vec());
                Ok(Flow::Continue)
            })
            .unwrap();
        (flow, seen)
    }

    #[test]
    fn default_flow_is_continue() {
        assert_eq!(Flow::default(), Flow::Continue);
        assert!(!Flow::Continue.is_stop());
        assert!(Flow::Stop.is_stop());
    }

    #[test]
    fn iter_source_yields_every_chunk_in_order() {
        let mut source = from_chunks(["ab", "cd", "ef"]);
        let (flow, seen) = collect(&mut source);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(seen, vec![b"ab".to_vec(), b"cd".to_vec(), b"ef".to_vec()]);
    }

    #[test]
    fn empty_source_never_calls_sink() {
        let mut source = from_chunks(Vec::<Vec<u8>>::new());
        let mut calls = 0;
        let flow = source
            .drive(|_| {
                calls += 1;
                Ok(Flow::Continue)
            })
            .unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(calls, 0);
    }

    #[test]
    fn stop_halts_and_leaves_rest_for_next_drive() {
        let mut source = from_chunks(vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec()]);
        let mut first = Vec::new();
        let flow = source
            .drive(|chunk| {
                first.push(chunk.to_vec());
                Ok(Flow::Stop)
            })
            .unwrap();
        assert_eq!(flow, Flow::Stop);
        assert_eq!(first, vec![b"1".to_vec()]);

        let (flow, rest) = collect(&mut source);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(rest, vec![b"2".to_vec(), b"3".to_vec()]);
    }

    #[test]
    fn sink_error_propagates() {
        let mut source = from_chunks(["a", "b"]);
        let mut calls = 0;
        let result = source.drive(|_| {
            calls += 1;
            Err(PipeError::Closed)
        });
        assert!(matches!(result, Err(PipeError::Closed)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn mutable_reference_is_a_source() {
        let mut source = from_chunks(["x"]);
        let mut by_ref = &mut source;
        let (flow, seen) = collect(&mut by_ref);
        assert_eq!(flow, Flow::Continue);
        assert_eq!(seen, vec![b"x".to_vec()]);
    }
}
