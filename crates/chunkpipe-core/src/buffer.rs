//! Fixed-capacity byte buffer shared by the reader and writer.
//!
//! The layout is a valid-data prefix followed by a free tail:
//!
//! ```text
//! 0            len                      capacity
//! |---- data ----|------ tailroom ------|
//! ```
//!
//! Capacity is fixed when the buffer is created. Nothing here grows it.

/// Contiguous, owned, fixed-capacity byte storage.
#[derive(Debug, Clone)]
pub struct ByteBuffer {
    storage: Box<[u8]>,
    len: usize,
}

impl ByteBuffer {
    /// Allocate a zeroed buffer of `capacity` bytes with no valid data.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes that can still be appended without a flush.
    pub fn tailroom(&self) -> usize {
        self.capacity() - self.len
    }

    /// The valid data region.
    pub fn data(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// The free region after the valid data.
    pub fn tail(&self) -> &[u8] {
        &self.storage[self.len..]
    }

    pub fn writable_tail(&mut self) -> &mut [u8] {
        &mut self.storage[self.len..]
    }

    /// Mark `n` more bytes of the tail as valid data.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the tailroom.
    pub fn append(&mut self, n: usize) {
        assert!(
            n <= self.tailroom(),
            "append of {n} bytes exceeds tailroom of {}",
            self.tailroom()
        );
        self.len += n;
    }

    /// Copy `bytes` into the tail and mark them valid.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` does not fit in the tailroom.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        let n = bytes.len();
        self.writable_tail()[..n].copy_from_slice(bytes);
        self.append(n);
    }

    /// Drop all valid data. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}
