use crate::error::ArrayError;
use getset::CopyGetters;
use log::trace;
use std::{
    alloc::{self, Layout},
    fmt,
    marker::PhantomData,
    mem::{self, MaybeUninit},
    ops::{Index, IndexMut},
    ptr::NonNull,
    slice,
};

/// Uninitialized storage for exactly `capacity` elements of T.
///
/// Never constructs nor drops T, that's the responsibility of the owner.
/// Storage is released once, on drop, without touching the elements.
///
/// Zero sized T and zero capacity don't allocate, in which case
/// the pointer is dangling but still aligned.
#[derive(CopyGetters)]
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    /// Number of elements the storage can hold.
    #[getset(get_copy = "pub")]
    capacity: usize,
    _owns: PhantomData<T>,
}

impl<T> RawBuffer<T> {
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Aborts on allocation failure and panics on capacity overflow.
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(buffer) => buffer,
            Err(error) => error.raise(),
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        let layout = Self::layout(capacity)?;
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }

        // This is safe since layout has non zero size.
        let ptr = unsafe { alloc::alloc(layout) } as *mut T;
        let ptr = NonNull::new(ptr).ok_or(ArrayError::AllocFailed { layout })?;
        trace!(
            "Allocated {} bytes for {} elements of {}",
            layout.size(),
            capacity,
            std::any::type_name::<T>()
        );

        Ok(Self {
            ptr,
            capacity,
            _owns: PhantomData,
        })
    }

    /// Address of slot at `offset`.
    /// One past the last slot, `offset == capacity`, is allowed but
    /// must not be dereferenced.
    ///
    /// Panics if `offset > capacity`.
    pub fn offset(&self, offset: usize) -> *const T {
        self.slot_ptr(offset)
    }

    /// Same as [`offset`](Self::offset), for writing.
    pub fn offset_mut(&mut self, offset: usize) -> *mut T {
        self.slot_ptr(offset)
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    pub fn slots(&self) -> &[MaybeUninit<T>] {
        // This is safe since MaybeUninit<T> has the layout of T and
        // there is room for capacity of them.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast(), self.capacity) }
    }

    pub fn slots_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // This is safe since MaybeUninit<T> has the layout of T,
        // there is room for capacity of them, and access is exclusive.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Exchanges storage with other. Doesn't allocate.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    fn slot_ptr(&self, offset: usize) -> *mut T {
        assert!(
            offset <= self.capacity,
            "offset (is {}) should be <= capacity (is {})",
            offset,
            self.capacity
        );
        // This is safe since result is at most one past the end of the allocation.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    fn layout(capacity: usize) -> Result<Layout, ArrayError> {
        Layout::array::<T>(capacity).map_err(|_| ArrayError::overflow(capacity))
    }
}

// This is safe since RawBuffer has ownership of the storage, same as Vec.
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if let Ok(layout) = Self::layout(self.capacity) {
            if layout.size() != 0 {
                // This is safe since the storage was allocated with the same layout
                // and this is the only owner of it.
                unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) };
                trace!("Released {} bytes", layout.size());
            }
        }
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for RawBuffer<T> {
    type Output = MaybeUninit<T>;

    /// Panics if `index >= capacity`.
    fn index(&self, index: usize) -> &Self::Output {
        assert!(
            index < self.capacity,
            "index (is {}) should be < capacity (is {})",
            index,
            self.capacity
        );
        &self.slots()[index]
    }
}

impl<T> IndexMut<usize> for RawBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        assert!(
            index < self.capacity,
            "index (is {}) should be < capacity (is {})",
            index,
            self.capacity
        );
        &mut self.slots_mut()[index]
    }
}

impl<T> fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
