use crate::{raw::RawBuffer, transfer};
use std::{fmt, iter::FusedIterator, slice};

/// By value iterator over a [`DynamicArray`](crate::DynamicArray).
///
/// Owns the buffer. Elements in `[start, end)` are live, the rest
/// have been yielded or were never there. Unyielded elements are
/// dropped together with the iterator.
pub struct IntoIter<T> {
    data: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// First `len` elements of `data` must be live.
    pub(crate) fn new(data: RawBuffer<T>, len: usize) -> Self {
        debug_assert!(len <= data.capacity());
        Self {
            data,
            start: 0,
            end: len,
        }
    }

    /// Remaining elements.
    pub fn as_slice(&self) -> &[T] {
        // This is safe since [start, end) is live.
        unsafe { slice::from_raw_parts(self.data.offset(self.start), self.end - self.start) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.end - self.start;
        // This is safe since [start, end) is live and access is exclusive.
        unsafe { slice::from_raw_parts_mut(self.data.offset_mut(self.start), len) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let index = self.start;
        self.start += 1;
        // This is safe since the slot was live and is now outside of the live range.
        Some(unsafe { self.data.offset(index).read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // This is safe since the slot was live and is now outside of the live range.
        Some(unsafe { self.data.offset(self.end).read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let (start, end) = (self.start, self.end);
        self.start = end;
        // This is safe since [start, end) was live and is no longer tracked.
        unsafe { transfer::destroy(self.data.offset_mut(start), end - start) };
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
