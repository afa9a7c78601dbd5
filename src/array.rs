use crate::{error::ArrayError, iter::IntoIter, raw::RawBuffer, transfer};
use log::debug;
use std::{
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    mem::{self, ManuallyDrop},
    ops::{Deref, DerefMut, Index, IndexMut},
    ptr,
    slice::{self, SliceIndex},
};

/// Growable contiguous array of T built on a [`RawBuffer`].
///
/// Exactly the first `len` slots of the buffer are live, the rest is
/// uninitialized. Every operation that reallocates first prepares the whole
/// new buffer and only then swaps it in, so if constructing the new element
/// fails, by a panic or by an `Err` from the `try_*` family, the array is
/// left as it was.
///
/// Indices returned by insertion and removal are stable, addresses are not.
/// Anything that can reallocate moves the elements.
pub struct DynamicArray<T> {
    data: RawBuffer<T>,
    len: usize,
}

impl<T> DynamicArray<T> {
    /// Capacity after first growth of an empty array.
    pub const MIN_NON_ZERO_CAPACITY: usize = 1;
    pub const GROWTH_FACTOR: usize = 2;

    pub const fn new() -> Self {
        Self {
            data: RawBuffer::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: RawBuffer::with_capacity(capacity),
            len: 0,
        }
    }

    /// Array of `len` default values.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        let mut array = Self::with_capacity(len);
        array.resize_with(len, T::default);
        array
    }

    /// Array of `len` clones of `elem`.
    pub fn from_elem(elem: T, len: usize) -> Self
    where
        T: Clone,
    {
        let mut array = Self::with_capacity(len);
        array.resize_with(len, || elem.clone());
        array
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Grows capacity to exactly `new_capacity`, if it's larger than current.
    ///
    /// Aborts on allocation failure.
    pub fn reserve(&mut self, new_capacity: usize) {
        if let Err(error) = self.try_reserve(new_capacity) {
            error.raise();
        }
    }

    /// Same as `reserve` but returns allocation failure, in which case
    /// nothing has changed.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), ArrayError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }

        let new_data = RawBuffer::try_with_capacity(new_capacity)?;
        self.commit(new_data, None);
        Ok(())
    }

    /// Resizes to `new_len`, default constructing new elements.
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Resizes to `new_len`, constructing new elements with `f`.
    ///
    /// If `f` panics, the new elements constructed so far are dropped and
    /// length is unchanged. Capacity may have grown.
    pub fn resize_with(&mut self, new_len: usize, f: impl FnMut() -> T) {
        let len = self.len;
        if new_len > len {
            self.reserve(new_len);
            // This is safe since [len, new_len) is within capacity and uninitialized.
            unsafe { transfer::construct_with(self.data.offset_mut(len), new_len - len, f) };
            self.len = new_len;
        } else {
            self.truncate(new_len);
        }
    }

    /// Drops elements from `new_len` on. No-op if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        let len = self.len;
        if new_len >= len {
            return;
        }
        // Length first, so that a panicking drop can't cause a double drop.
        self.len = new_len;
        // This is safe since [new_len, len) was live and is now outside of len.
        unsafe { transfer::destroy(self.data.offset_mut(new_len), len - new_len) };
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Constructs element at the end with `f`.
    pub fn emplace_back_with(&mut self, f: impl FnOnce() -> T) -> &mut T {
        match self.try_emplace_back_with(|| Ok::<T, Infallible>(f())) {
            Ok(slot) => slot,
            Err(never) => match never {},
        }
    }

    /// Constructs element at the end with `f`.
    ///
    /// If `f` fails the error is returned and array is unchanged.
    pub fn try_emplace_back_with<E>(
        &mut self,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, E> {
        let len = self.len;
        if len == self.capacity() {
            // New element is constructed before anything is moved,
            // so old buffer stays untouched if it fails.
            let mut new_data: RawBuffer<T> = RawBuffer::with_capacity(self.grown_capacity());
            let value = f()?;
            // This is safe since new_data has room for more than len elements.
            unsafe { new_data.offset_mut(len).write(value) };
            self.commit(new_data, None);
        } else {
            let value = f()?;
            // This is safe since len < capacity and the slot is uninitialized.
            unsafe { self.data.offset_mut(len).write(value) };
        }
        self.len = len + 1;

        // This is safe since the slot was just initialized.
        Ok(unsafe { &mut *self.data.offset_mut(len) })
    }

    pub fn push_back(&mut self, value: T) {
        self.emplace_back_with(|| value);
    }

    /// Drops the last element.
    ///
    /// Panics if empty.
    pub fn pop_back(&mut self) {
        assert!(self.len > 0, "pop_back on an empty array");
        self.truncate(self.len - 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.len = self.len.checked_sub(1)?;
        // This is safe since the slot was live and is now outside of len.
        Some(unsafe { self.data.offset(self.len).read() })
    }

    /// Constructs element at `index` with `f`, shifting the rest to the right.
    /// Returns `index`.
    ///
    /// Panics if `index > len`.
    pub fn emplace_with(&mut self, index: usize, f: impl FnOnce() -> T) -> usize {
        match self.try_emplace_with(index, || Ok::<T, Infallible>(f())) {
            Ok(index) => index,
            Err(never) => match never {},
        }
    }

    /// Constructs element at `index` with `f`, shifting the rest to the right.
    ///
    /// If `f` fails the error is returned and array is unchanged.
    ///
    /// Panics if `index > len`.
    pub fn try_emplace_with<E>(
        &mut self,
        index: usize,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<usize, E> {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {}) should be <= len (is {})",
            index,
            len
        );

        if index == len {
            self.try_emplace_back_with(f)?;
            return Ok(index);
        }

        if len == self.capacity() {
            let mut new_data: RawBuffer<T> = RawBuffer::with_capacity(self.grown_capacity());
            let value = f()?;
            // This is safe since index < len < new capacity.
            unsafe { new_data.offset_mut(index).write(value) };
            self.commit(new_data, Some(index));
        } else {
            let value = f()?;
            // This is safe since [index, len) is live and there is room for one more
            // at len. Shifting is a relocation so it can't fail halfway.
            unsafe {
                let slot = self.data.offset_mut(index);
                transfer::shift(slot, len - index, slot.add(1));
                slot.write(value);
            }
        }
        self.len = len + 1;

        Ok(index)
    }

    /// Inserts `value` at `index`, shifting the rest to the right.
    /// Returns `index`.
    pub fn insert(&mut self, index: usize, value: T) -> usize {
        self.emplace_with(index, || value)
    }

    /// Drops element at `index`, shifting the rest to the left.
    /// Returns index of the element that followed it, which is `index`.
    ///
    /// Erasing at `len`, the end position, drops the last element
    /// and returns the new `len`.
    ///
    /// Panics if `index > len` or if array is empty.
    pub fn erase(&mut self, index: usize) -> usize {
        if index == self.len {
            self.pop_back();
            self.len
        } else {
            // Dropped after array is consistent again.
            drop(self.remove(index));
            index
        }
    }

    /// Removes and returns element at `index`, shifting the rest to the left.
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(
            index < len,
            "removal index (is {}) should be < len (is {})",
            index,
            len
        );

        // This is safe since index < len and the removed slot is
        // overwritten by the shift before len is reduced.
        unsafe {
            let slot = self.data.offset_mut(index);
            let removed = slot.read();
            transfer::shift(slot.add(1), len - index - 1, slot);
            self.len = len - 1;
            removed
        }
    }

    /// Exchanges contents with other, buffers and lengths both.
    pub fn swap(&mut self, other: &mut Self) {
        self.data.swap(&mut other.data);
        mem::swap(&mut self.len, &mut other.len);
    }

    pub fn as_slice(&self) -> &[T] {
        // This is safe since first len elements are live.
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // This is safe since first len elements are live and access is exclusive.
        unsafe { slice::from_raw_parts_mut(self.data.as_mut_ptr(), self.len) }
    }

    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }

    fn grown_capacity(&self) -> usize {
        let capacity = self.capacity();
        match capacity.checked_mul(Self::GROWTH_FACTOR) {
            Some(grown) => grown.max(Self::MIN_NON_ZERO_CAPACITY),
            None => ArrayError::overflow(capacity).raise(),
        }
    }

    /// Relocates all elements into `new_data` and swaps it in.
    /// With a `gap`, elements from it on are placed one slot further,
    /// leaving the slot at `gap` to the caller.
    ///
    /// Relocated originals aren't dropped, old storage is released
    /// when `new_data` goes out of scope.
    fn commit(&mut self, mut new_data: RawBuffer<T>, gap: Option<usize>) {
        let len = self.len;
        let (split, shift) = match gap {
            Some(gap) => (gap, 1),
            None => (len, 0),
        };
        debug_assert!(split <= len);
        debug_assert!(len + shift <= new_data.capacity());

        // This is safe since [0, len) is live, new_data has room for len + shift
        // elements, and the two buffers don't overlap.
        unsafe {
            transfer::relocate(self.data.offset(0), split, new_data.offset_mut(0));
            transfer::relocate(
                self.data.offset(split),
                len - split,
                new_data.offset_mut(split + shift),
            );
        }

        debug!(
            "Reallocated {} elements from capacity {} to {}",
            len,
            self.capacity(),
            new_data.capacity()
        );
        self.data.swap(&mut new_data);
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // Buffer releases the storage on its own.
        // This is safe since exactly the first len elements are live.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        Self::from(self.as_slice())
    }

    /// Reuses existing storage when it's large enough.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            let mut copy = source.clone();
            self.swap(&mut copy);
            return;
        }

        let common = self.len.min(source.len);
        self.as_mut_slice()[..common].clone_from_slice(&source[..common]);
        if self.len > source.len {
            self.truncate(source.len);
        } else {
            let len = self.len;
            // This is safe since source.len <= capacity and [len, source.len) is uninitialized.
            unsafe { transfer::clone_into_uninit(&source[len..], self.data.offset_mut(len)) };
            self.len = source.len;
        }
    }
}

impl<T: Clone> From<&[T]> for DynamicArray<T> {
    fn from(slice: &[T]) -> Self {
        let mut data = RawBuffer::with_capacity(slice.len());
        // This is safe since data has room for slice.len() uninitialized elements.
        unsafe { transfer::clone_into_uninit(slice, data.offset_mut(0)) };
        Self {
            data,
            len: slice.len(),
        }
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
    fn from(array: [T; N]) -> Self {
        let mut data = RawBuffer::with_capacity(N);
        let array = ManuallyDrop::new(array);
        // This is safe since data has room for N elements and array
        // is never dropped, so its elements are moved exactly once.
        unsafe { transfer::relocate(array.as_ptr(), N, data.offset_mut(0)) };
        Self { data, len: N }
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(self.len.saturating_add(lower));
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for DynamicArray<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let len = mem::replace(&mut self.len, 0);
        IntoIter::new(mem::take(&mut self.data), len)
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for DynamicArray<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T, I: SliceIndex<[T]>> Index<I> for DynamicArray<T> {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for DynamicArray<T> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: PartialEq<U>, U> PartialEq<DynamicArray<U>> for DynamicArray<T> {
    fn eq(&self, other: &DynamicArray<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<[U]> for DynamicArray<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U> PartialEq<&[U]> for DynamicArray<T> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for DynamicArray<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vec<U>> for DynamicArray<T> {
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Hash> Hash for DynamicArray<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
