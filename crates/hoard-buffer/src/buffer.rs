//! The allocator-backed growable buffer.
//!
//! [`OwnedBuffer`] holds its storage, its length, and the allocator that
//! issued the storage. It is move-only: handing it to another scope moves
//! ownership, and there is no implicit copy. [`OwnedBuffer::release`]
//! consumes the buffer, so releasing twice or touching a released buffer
//! does not compile. `Drop` performs the same release, which covers early
//! returns, `?` propagation and unwinding.
//!
//! # Growth
//!
//! When an append finds the buffer full, a new block of
//! `max(capacity * growth_factor, required, min_non_zero_capacity)` slots
//! is requested, the live elements are moved into it in order, and only
//! then is the old block returned. If the request fails the buffer is
//! untouched.
//!
//! # Lifecycle violations are compile errors
//!
//! Using a buffer after release:
//!
//! ```compile_fail
//! use hoard_buffer::OwnedBuffer;
//!
//! let mut buf = OwnedBuffer::new();
//! buf.push(1u8).unwrap();
//! buf.release();
//! buf.push(2u8).unwrap();
//! ```
//!
//! Growing a buffer while a view into it is still in use:
//!
//! ```compile_fail
//! use hoard_buffer::OwnedBuffer;
//!
//! let mut buf = OwnedBuffer::new();
//! buf.push(1u8).unwrap();
//! let view = buf.as_slice();
//! buf.push(2u8).unwrap();
//! assert_eq!(view.len(), 1);
//! ```

#![allow(unsafe_code)]

use std::fmt;
use std::ops::RangeBounds;

use hoard_core::{Allocator, Global};

use crate::config::BufferConfig;
use crate::error::BufferError;
use crate::fixed::FixedSlice;
use crate::raw::RawStorage;
use crate::slice::{Slice, SliceMut};

/// A growable, contiguous, exclusively owned store of `T`.
pub struct OwnedBuffer<T, A: Allocator = Global> {
    raw: RawStorage<T>,
    /// Number of initialised slots at the front of `raw`. Never exceeds
    /// `raw.capacity()`.
    len: usize,
    alloc: A,
    config: BufferConfig,
}

impl<T> OwnedBuffer<T, Global> {
    /// Create an empty buffer backed by the process allocator.
    pub const fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<T> Default for OwnedBuffer<T, Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: Allocator> OwnedBuffer<T, A> {
    /// Create an empty buffer that will draw storage from `alloc`.
    ///
    /// Does not allocate.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            raw: RawStorage::empty(),
            len: 0,
            alloc,
            config: BufferConfig::new(),
        }
    }

    /// Create an empty buffer with room for `capacity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMemory`] if the allocator refuses.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, BufferError> {
        Self::with_config_in(BufferConfig::new().with_initial_capacity(capacity), alloc)
    }

    /// Create an empty buffer governed by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidArgument`] if the config fails
    /// validation, or [`BufferError::OutOfMemory`] if the initial
    /// allocation is refused.
    pub fn with_config_in(config: BufferConfig, alloc: A) -> Result<Self, BufferError> {
        config.validate()?;
        let raw = RawStorage::with_capacity_in(config.initial_capacity, &alloc)?;
        Ok(Self {
            raw,
            len: 0,
            alloc,
            config,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of element slots currently held.
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// The allocator that issued this buffer's storage.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// The growth policy in force.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Append `value` at the end, growing if the buffer is full.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMemory`] if growth was needed and the
    /// allocator refused; length, capacity and contents are unchanged and
    /// `value` is dropped.
    pub fn push(&mut self, value: T) -> Result<(), BufferError> {
        if self.len == self.raw.capacity() {
            self.grow_for(1)?;
        }
        // SAFETY: `len < capacity` after the check above, and slot `len` is
        // uninitialised.
        unsafe { self.raw.write(self.len, value) };
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[track_caller]
    pub fn pop(&mut self) -> T {
        assert!(self.len > 0, "pop on an empty buffer");
        self.len -= 1;
        // SAFETY: slot `len` was initialised and is now outside the live range.
        unsafe { self.raw.read(self.len) }
    }

    /// Make room for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMemory`] if the allocator refuses; the
    /// buffer is unchanged.
    pub fn reserve(&mut self, additional: usize) -> Result<(), BufferError> {
        self.grow_for(additional)
    }

    /// Append clones of every element of `items`.
    ///
    /// Either all elements are appended or, on allocation failure, none.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMemory`] if the allocator refuses.
    pub fn extend_from_slice(&mut self, items: Slice<'_, T>) -> Result<(), BufferError>
    where
        T: Clone,
    {
        self.grow_for(items.len())?;
        for item in items {
            // SAFETY: capacity was reserved for every item; `len` advances
            // per element so a panicking `clone` leaves no gap.
            unsafe { self.raw.write(self.len, item.clone()) };
            self.len += 1;
        }
        Ok(())
    }

    /// Drop every element, keeping the storage.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Drop elements past `new_len`. No effect if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let old_len = self.len;
        self.len = new_len;
        // SAFETY: `new_len..old_len` was initialised and is now outside the
        // live range.
        unsafe { self.raw.drop_range(new_len, old_len) };
    }

    /// Return all storage to the allocator.
    ///
    /// Consumes the buffer; the compiler rejects any later use.
    pub fn release(self) {
        log::debug!(
            "releasing buffer: {} element(s), {} slot(s)",
            self.len,
            self.raw.capacity()
        );
        drop(self);
    }

    /// View the live elements.
    pub fn as_slice(&self) -> Slice<'_, T> {
        Slice::from_std(self.items())
    }

    /// Mutably view the live elements.
    pub fn as_mut_slice(&mut self) -> SliceMut<'_, T> {
        SliceMut::from_std(self.items_mut())
    }

    /// View `range` of the live elements.
    ///
    /// # Panics
    ///
    /// Panics if `range` is malformed or exceeds `len`.
    #[track_caller]
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Slice<'_, T> {
        Slice::new(self.items(), range)
    }

    /// Mutably view `range` of the live elements.
    ///
    /// # Panics
    ///
    /// Panics if `range` is malformed or exceeds `len`.
    #[track_caller]
    pub fn slice_mut(&mut self, range: impl RangeBounds<usize>) -> SliceMut<'_, T> {
        SliceMut::new(self.items_mut(), range)
    }

    /// Bound-Known view of the `N` elements starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start + N > len`.
    #[track_caller]
    pub fn fixed<const N: usize>(&self, start: usize) -> FixedSlice<'_, T, N> {
        FixedSlice::within(self.items(), start)
    }

    /// Iterate over the live elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items().iter()
    }

    /// Explicit deep copy drawing from a clone of the allocator handle.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfMemory`] if the allocator refuses.
    pub fn try_clone(&self) -> Result<Self, BufferError>
    where
        T: Clone,
        A: Clone,
    {
        let config = self.config.with_initial_capacity(self.len);
        let mut copy = Self::with_config_in(config, self.alloc.clone())?;
        copy.extend_from_slice(self.as_slice())?;
        Ok(copy)
    }

    fn items(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialised.
        unsafe { self.raw.slice(self.len) }
    }

    fn items_mut(&mut self) -> &mut [T] {
        // SAFETY: the first `len` slots are initialised.
        unsafe { self.raw.slice_mut(self.len) }
    }

    /// Ensure `additional` free slots, relocating if necessary.
    fn grow_for(&mut self, additional: usize) -> Result<(), BufferError> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or_else(|| BufferError::capacity_overflow::<T>(usize::MAX))?;
        let capacity = self.raw.capacity();
        if required <= capacity {
            return Ok(());
        }
        let new_cap = self.config.next_capacity(capacity, required);
        match self.raw.relocate_in(self.len, new_cap, &self.alloc) {
            Ok(()) => {
                log::trace!("buffer grew from {capacity} to {new_cap} slots, moved {} element(s)", self.len);
                Ok(())
            }
            Err(err) => {
                log::warn!("buffer growth from {capacity} to {new_cap} slots failed: {err}");
                Err(err)
            }
        }
    }
}

/// Returns the block to its allocator when dropped, including while
/// unwinding out of an element destructor.
struct ReleaseOnDrop<'a, T, A: Allocator> {
    raw: &'a mut RawStorage<T>,
    alloc: &'a A,
}

impl<T, A: Allocator> Drop for ReleaseOnDrop<'_, T, A> {
    fn drop(&mut self) {
        self.raw.release_in(self.alloc);
    }
}

impl<T, A: Allocator> Drop for OwnedBuffer<T, A> {
    fn drop(&mut self) {
        let len = self.len;
        self.len = 0;
        let mut guard = ReleaseOnDrop {
            raw: &mut self.raw,
            alloc: &self.alloc,
        };
        // SAFETY: `0..len` was initialised; the length is reset first so a
        // panicking destructor cannot cause a second drop.
        unsafe { guard.raw.drop_range(0, len) };
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a OwnedBuffer<T, A> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for OwnedBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq<U>, U, A: Allocator, B: Allocator> PartialEq<OwnedBuffer<U, B>>
    for OwnedBuffer<T, A>
{
    fn eq(&self, other: &OwnedBuffer<U, B>) -> bool {
        self.items() == other.items()
    }
}

impl<T: Eq, A: Allocator> Eq for OwnedBuffer<T, A> {}

impl<T: PartialEq<U>, U, A: Allocator> PartialEq<Slice<'_, U>> for OwnedBuffer<T, A> {
    fn eq(&self, other: &Slice<'_, U>) -> bool {
        self.items() == other.as_std()
    }
}

impl<T: PartialEq<U>, U, A: Allocator, const N: usize> PartialEq<[U; N]> for OwnedBuffer<T, A> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.items() == other.as_slice()
    }
}
