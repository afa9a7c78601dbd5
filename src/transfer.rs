//! Element migration between slots.
//!
//! Reallocation relocates elements. A Rust move is a bitwise copy that runs
//! no user code, so relocation can't fail partway for any element type, and
//! relocating is always the right choice when migrating to a new buffer.
//! Relocated slots are left moved-from and must not be dropped.
//!
//! Cloning is for places where copies are the point, like cloning the array.
//! Those go through [`InitGuard`] so that a panicking `clone` leaves no
//! partially constructed range behind.

use std::{mem, ptr};

/// Relocates `count` elements from `src` to `dst`.
///
/// # Safety
/// - `src..src + count` must be initialized, and is moved-from afterwards.
/// - `dst..dst + count` must be valid for writes and must not overlap with source.
pub unsafe fn relocate<T>(src: *const T, count: usize, dst: *mut T) {
    ptr::copy_nonoverlapping(src, dst, count);
}

/// Relocates `count` elements from `src` to `dst` inside one buffer.
///
/// # Safety
/// Same as [`relocate`] except that ranges may overlap.
pub unsafe fn shift<T>(src: *const T, count: usize, dst: *mut T) {
    ptr::copy(src, dst, count);
}

/// Drops `count` elements starting at `start`.
///
/// # Safety
/// Range must be initialized, and is uninitialized afterwards.
pub unsafe fn destroy<T>(start: *mut T, count: usize) {
    ptr::drop_in_place(ptr::slice_from_raw_parts_mut(start, count));
}

/// Clone-constructs `src` into uninitialized slots starting at `dst`.
///
/// If a clone panics, the clones made so far are dropped and
/// destination is uninitialized again.
///
/// # Safety
/// `dst..dst + src.len()` must be valid for writes and uninitialized.
pub unsafe fn clone_into_uninit<T: Clone>(src: &[T], dst: *mut T) {
    let mut guard = InitGuard::new(dst);
    for item in src {
        guard.push(item.clone());
    }
    guard.finish();
}

/// Constructs `count` elements with `f` into uninitialized slots starting at `dst`.
///
/// If `f` panics, elements constructed so far are dropped.
///
/// # Safety
/// `dst..dst + count` must be valid for writes and uninitialized.
pub unsafe fn construct_with<T>(dst: *mut T, count: usize, mut f: impl FnMut() -> T) {
    let mut guard = InitGuard::new(dst);
    for _ in 0..count {
        guard.push(f());
    }
    guard.finish();
}

/// Tracks a range of slots that is being initialized front to back.
///
/// Dropping the guard drops the initialized prefix, which is what
/// happens on unwind. [`InitGuard::finish`] disarms it.
pub struct InitGuard<T> {
    start: *mut T,
    initialized: usize,
}

impl<T> InitGuard<T> {
    /// # Safety
    /// Slots from `start` on must be valid for writes for as long as
    /// `push` is called.
    pub unsafe fn new(start: *mut T) -> Self {
        Self {
            start,
            initialized: 0,
        }
    }

    pub fn push(&mut self, value: T) {
        // This is safe by the contract of `new`.
        unsafe { self.start.add(self.initialized).write(value) };
        self.initialized += 1;
    }

    /// Leaves initialized slots to the caller.
    pub fn finish(self) {
        mem::forget(self);
    }
}

impl<T> Drop for InitGuard<T> {
    fn drop(&mut self) {
        // This is safe since exactly this prefix was written to.
        unsafe { destroy(self.start, self.initialized) }
    }
}
