//! Raw element storage obtained from an [`Allocator`].
//!
//! [`RawStorage`] owns a pointer and a capacity but knows nothing about how
//! many slots are initialised; [`OwnedBuffer`](crate::OwnedBuffer) tracks
//! that. It never holds the allocator itself: every operation that touches
//! the allocator takes it as an argument, and the caller must always pass
//! the one that issued the current block.
//!
//! Zero-sized element types never reach the allocator. Their capacity is
//! reported as `usize::MAX` and the pointer stays dangling.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use hoard_core::Allocator;

use crate::error::BufferError;

pub(crate) struct RawStorage<T> {
    ptr: NonNull<T>,
    cap: usize,
    _owns: PhantomData<T>,
}

// SAFETY: `RawStorage` uniquely owns its block; sending it sends the `T`s.
unsafe impl<T: Send> Send for RawStorage<T> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for RawStorage<T> {}

impl<T> RawStorage<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// Storage with no block attached.
    pub(crate) const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: if Self::IS_ZST { usize::MAX } else { 0 },
            _owns: PhantomData,
        }
    }

    /// Storage with room for at least `cap` elements.
    pub(crate) fn with_capacity_in<A: Allocator>(cap: usize, alloc: &A) -> Result<Self, BufferError> {
        if cap == 0 || Self::IS_ZST {
            return Ok(Self::empty());
        }
        let layout = Self::layout_for(cap)?;
        let ptr = alloc.allocate(layout)?.cast::<T>();
        Ok(Self {
            ptr,
            cap,
            _owns: PhantomData,
        })
    }

    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    /// Move the first `len` elements into a fresh block of `new_cap` slots,
    /// then return the old block.
    ///
    /// On error nothing has changed: the old block and its contents are
    /// still in place.
    pub(crate) fn relocate_in<A: Allocator>(
        &mut self,
        len: usize,
        new_cap: usize,
        alloc: &A,
    ) -> Result<(), BufferError> {
        debug_assert!(len <= self.cap && len <= new_cap);
        if Self::IS_ZST {
            return Ok(());
        }
        let mut fresh = Self::with_capacity_in(new_cap, alloc)?;
        // SAFETY: both blocks hold at least `len` slots and are distinct
        // allocations; the first `len` slots of `self` are initialised.
        // After the copy the old slots are treated as moved-from.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), fresh.ptr.as_ptr(), len) };
        mem::swap(self, &mut fresh);
        fresh.release_in(alloc);
        Ok(())
    }

    /// Return the block to `alloc`. Does not drop any elements.
    pub(crate) fn release_in<A: Allocator>(&mut self, alloc: &A) {
        if self.cap == 0 || Self::IS_ZST {
            return;
        }
        // `cap` slots were successfully laid out when the block was issued.
        if let Ok(layout) = Self::layout_for(self.cap) {
            // SAFETY: `ptr` was issued by `alloc` for exactly this layout and
            // is returned once; `self` is reset to empty below.
            unsafe { alloc.deallocate(self.ptr.cast::<u8>(), layout) };
        }
        *self = Self::empty();
    }

    /// Write `value` into slot `index` without dropping the previous contents.
    ///
    /// # Safety
    ///
    /// `index < capacity` and the slot must be uninitialised.
    pub(crate) unsafe fn write(&mut self, index: usize, value: T) {
        // SAFETY: caller guarantees the slot is in bounds.
        unsafe { self.ptr.as_ptr().add(index).write(value) }
    }

    /// Move the value out of slot `index`, leaving it uninitialised.
    ///
    /// # Safety
    ///
    /// `index < capacity` and the slot must be initialised.
    pub(crate) unsafe fn read(&mut self, index: usize) -> T {
        // SAFETY: caller guarantees the slot is initialised.
        unsafe { self.ptr.as_ptr().add(index).read() }
    }

    /// Borrow the first `len` slots.
    ///
    /// # Safety
    ///
    /// The first `len` slots must be initialised.
    pub(crate) unsafe fn slice(&self, len: usize) -> &[T] {
        // SAFETY: caller guarantees initialisation; `ptr` is non-null and aligned.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), len) }
    }

    /// Mutably borrow the first `len` slots.
    ///
    /// # Safety
    ///
    /// The first `len` slots must be initialised.
    pub(crate) unsafe fn slice_mut(&mut self, len: usize) -> &mut [T] {
        // SAFETY: as for `slice`, plus `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), len) }
    }

    /// Drop the elements in `start..end` in place.
    ///
    /// # Safety
    ///
    /// The slots must be initialised and are uninitialised afterwards.
    pub(crate) unsafe fn drop_range(&mut self, start: usize, end: usize) {
        // SAFETY: caller guarantees the range is initialised.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(self.ptr.as_ptr().add(start), end - start);
            ptr::drop_in_place(tail);
        }
    }

    fn layout_for(cap: usize) -> Result<Layout, BufferError> {
        Layout::array::<T>(cap).map_err(|_| BufferError::capacity_overflow::<T>(cap))
    }
}
