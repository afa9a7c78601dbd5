//! # Goal
//! A growable contiguous array built directly on raw, uninitialized memory,
//! with explicit control over when elements are constructed and dropped.
//!
//! Primary attribute is failure safety. An operation that reallocates either
//! fully succeeds, or leaves the array exactly as it was, whether the failure
//! was an `Err` from a fallible constructor, a panicking constructor or clone,
//! or an allocation error reported through [`ArrayError`]. Elements are never
//! lost nor dropped twice.
//!
//! # Architecture
//! Two layers, leaf first:
//! - [`RawBuffer`] - storage for exactly `capacity` elements. Provides
//!   addressing and swap, never constructs nor drops elements.
//! - [`DynamicArray`] - owns live elements in the first `len` slots of a
//!   `RawBuffer` and does all of the constructing, relocating and dropping.
//!
//! Reallocation follows one pattern: allocate new buffer, construct the new
//! element in its final slot, relocate existing elements, then swap buffers.
//! Swap is the commit point. Old storage is released when the temporary
//! buffer goes out of scope, without touching the moved-from slots.
//!
//! # Growth
//! Capacity grows by [`DynamicArray::GROWTH_FACTOR`] starting from
//! [`DynamicArray::MIN_NON_ZERO_CAPACITY`], so pushing to an empty array
//! goes through capacities 1, 2, 4, 8, ... `reserve` and `resize` allocate
//! exactly what was asked for.
//!
//! # Invalidation
//! Anything that can reallocate moves the elements, so addresses obtained
//! before are invalid afterwards. Borrow checker already forbids holding
//! references across such calls. Indices returned by `insert` and `erase`
//! stay meaningful.
//!
//! # Threads
//! Single owner. No internal synchronization, `Send` and `Sync` follow T.

//? Important decisions:
//? - Rust moves never fail, so reallocation always relocates instead of cloning.
//? - Index access is bounds checked since it's safe API. Unchecked access is
//?   available through the slice methods.

#[macro_use]
mod macros;

pub mod array;
pub mod error;
pub mod iter;
pub mod raw;
mod transfer;

#[cfg(test)]
mod test_util;

pub use array::DynamicArray;
pub use error::ArrayError;
pub use iter::IntoIter;
pub use raw::RawBuffer;
