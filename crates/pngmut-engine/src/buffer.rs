//! # Working Buffer
//!
//! The engine's single owned output buffer. Capacity is fixed per invocation
//! (candidate length + slack, capped by the host maximum) and every splice is
//! checked against it before a byte moves, so a grown chunk stream can never
//! spill past what the host agreed to accept.

use std::collections::TryReserveError;

/// Capacity-tracked byte buffer with in-place splice moves.
///
/// `len() <= capacity()` always holds. The backing `Vec` may physically
/// reserve more than `capacity()`; only `capacity()` is authoritative.
#[derive(Debug, Default)]
pub struct WorkingBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl WorkingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the current allocation, allocate `capacity` bytes fresh and copy
    /// `input` in, truncated to `capacity`.
    ///
    /// On allocation failure the buffer is left empty with zero capacity.
    pub fn refresh(&mut self, input: &[u8], capacity: usize) -> Result<(), TryReserveError> {
        self.release();

        let mut data = Vec::new();
        data.try_reserve_exact(capacity)?;
        let copied = input.len().min(capacity);
        data.extend_from_slice(&input[..copied]);

        self.data = data;
        self.capacity = capacity;
        Ok(())
    }

    /// Free the allocation.
    pub fn release(&mut self) {
        self.data = Vec::new();
        self.capacity = 0;
    }

    /// Logical length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maximum logical length for this invocation.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes still available before hitting `capacity()`.
    #[inline]
    pub fn headroom(&self) -> usize {
        self.capacity - self.data.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Insert a copy of `[start, start + len)` immediately after itself,
    /// shifting the tail forward by `len`.
    ///
    /// Returns `false` without touching the buffer if the source range is not
    /// inside the logical length or the result would exceed `capacity()`.
    pub fn duplicate_range(&mut self, start: usize, len: usize) -> bool {
        let old_len = self.data.len();
        let Some(src_end) = start.checked_add(len) else {
            return false;
        };
        if src_end > old_len || len > self.headroom() {
            return false;
        }

        // Within the reserved capacity: no reallocation.
        self.data.resize(old_len + len, 0);
        self.data.copy_within(src_end..old_len, src_end + len);
        self.data.copy_within(start..src_end, src_end);
        true
    }

    /// Remove `[start, start + len)`, shifting the tail backward by `len`.
    ///
    /// Returns `false` without touching the buffer if the range is not inside
    /// the logical length.
    pub fn remove_range(&mut self, start: usize, len: usize) -> bool {
        let old_len = self.data.len();
        let Some(end) = start.checked_add(len) else {
            return false;
        };
        if end > old_len {
            return false;
        }

        self.data.copy_within(end..old_len, start);
        self.data.truncate(old_len - len);
        true
    }
}
