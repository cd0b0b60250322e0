//! Growable output buffer for COPY encoding.
//!
//! One `CopyBuffer` lives inside each encoder and is reused across calls.
//! Capacity is tracked logically and always has the form `256 * 2^k`
//! (or 0 before the first write). It grows by doubling and never shrinks.
//!
//! Every reservation goes through [`CopyBuffer::ensure_capacity`], which is
//! fallible: a failed growth leaves the previous storage and capacity intact.

use crate::error::{EncodeError, EncodeResult};

/// Smallest capacity ever allocated.
pub const MIN_CAPACITY: usize = 256;

/// Reusable byte buffer with a doubling growth policy.
#[derive(Debug, Default)]
pub struct CopyBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl CopyBuffer {
    /// Create an empty buffer. Nothing is allocated until the first reservation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with at least `capacity` bytes reserved up front.
    pub fn with_capacity(capacity: usize) -> EncodeResult<Self> {
        let mut buf = Self::new();
        if capacity > 0 {
            buf.ensure_capacity(capacity)?;
        }
        Ok(buf)
    }

    /// Make sure the buffer can hold `required` bytes in total.
    ///
    /// Grows to the smallest `256 * 2^k >= required`, doubling from the
    /// current capacity.
    pub fn ensure_capacity(&mut self, required: usize) -> EncodeResult<()> {
        if required <= self.capacity {
            return Ok(());
        }

        let target = next_capacity(self.capacity, required)
            .ok_or_else(|| EncodeError::out_of_memory(required))?;

        // `data.len() <= capacity < target`, so the subtraction cannot underflow.
        self.data
            .try_reserve_exact(target - self.data.len())
            .map_err(|_| EncodeError::out_of_memory(target))?;

        tracing::trace!(from = self.capacity, to = target, "grew copy buffer");
        self.capacity = target;
        Ok(())
    }

    /// Reserve room for `additional` bytes past the current length.
    pub fn reserve(&mut self, additional: usize) -> EncodeResult<()> {
        let required = self
            .data
            .len()
            .checked_add(additional)
            .ok_or_else(|| EncodeError::out_of_memory(usize::MAX))?;
        self.ensure_capacity(required)
    }

    /// Append bytes, growing first if needed.
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) -> EncodeResult<()> {
        self.reserve(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Append one byte, growing first if needed.
    #[inline]
    pub fn push(&mut self, byte: u8) -> EncodeResult<()> {
        self.reserve(1)?;
        self.data.push(byte);
        Ok(())
    }

    /// Mutable access to the written bytes for callers that already reserved.
    ///
    /// Writers must stay within the space granted by a prior
    /// [`ensure_capacity`](Self::ensure_capacity) call.
    pub(crate) fn as_mut_vec(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    /// Forget all written bytes. Capacity is kept.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Current write offset.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Logical capacity (`256 * 2^k`, or 0 before first use).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

/// Next capacity in the `256 * 2^k` series that covers `required`.
/// `None` on overflow.
fn next_capacity(current: usize, required: usize) -> Option<usize> {
    let mut size = if current == 0 { MIN_CAPACITY } else { current };
    while size < required {
        size = size.checked_mul(2)?;
    }
    Some(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_allocation() {
        let buf = CopyBuffer::new();
        assert_eq!(buf.capacity(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_first_growth_is_256() {
        let mut buf = CopyBuffer::new();
        buf.ensure_capacity(1).unwrap();
        assert_eq!(buf.capacity(), 256);
        buf.ensure_capacity(256).unwrap();
        assert_eq!(buf.capacity(), 256);
    }

    #[test]
    fn test_growth_doubles() {
        let mut buf = CopyBuffer::new();
        buf.ensure_capacity(257).unwrap();
        assert_eq!(buf.capacity(), 512);
        buf.ensure_capacity(3000).unwrap();
        assert_eq!(buf.capacity(), 4096);
    }

    #[test]
    fn test_never_shrinks() {
        let mut buf = CopyBuffer::new();
        buf.ensure_capacity(10_000).unwrap();
        let cap = buf.capacity();
        buf.reset();
        buf.ensure_capacity(10).unwrap();
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn test_with_capacity_rounds_up() {
        let buf = CopyBuffer::with_capacity(1000).unwrap();
        assert_eq!(buf.capacity(), 1024);
    }

    #[test]
    fn test_overflow_is_out_of_memory() {
        let mut buf = CopyBuffer::new();
        buf.ensure_capacity(16).unwrap();
        let err = buf.ensure_capacity(usize::MAX).unwrap_err();
        assert!(matches!(err, EncodeError::OutOfMemory { .. }));
        // Previous state is still usable.
        assert_eq!(buf.capacity(), 256);
        buf.append(b"ok").unwrap();
        assert_eq!(buf.as_slice(), b"ok");
    }

    #[test]
    fn test_append_grows_and_keeps_bytes() {
        let mut buf = CopyBuffer::new();
        let chunk = [b'z'; 200];
        buf.append(&chunk).unwrap();
        buf.append(&chunk).unwrap();
        assert_eq!(buf.len(), 400);
        assert_eq!(buf.capacity(), 512);
        assert!(buf.as_slice().iter().all(|&b| b == b'z'));
    }

    #[test]
    fn test_next_capacity() {
        assert_eq!(next_capacity(0, 1), Some(256));
        assert_eq!(next_capacity(512, 513), Some(1024));
        assert_eq!(next_capacity(256, usize::MAX), None);
    }
}
