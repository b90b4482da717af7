//! The allocator trait consumed by Hoard buffers.
//!
//! An [`Allocator`] hands out raw blocks on request and takes them back on
//! release. Buffers store the allocator next to the storage it produced, so
//! release always returns a block to its origin. Passing `&A` instead of
//! `A` lets one allocator back many buffers at once.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use crate::error::AllocError;

/// A source of raw memory blocks.
///
/// # Safety
///
/// Implementers must return blocks that are valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and not aliased by
/// any other live block. A block stays valid until it is passed back to
/// [`Allocator::deallocate`] on the same allocator (or a copy of the same
/// handle).
pub unsafe trait Allocator {
    /// Request a block for `layout`.
    ///
    /// Callers never request zero-sized layouts.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::OutOfMemory`] if the block cannot be supplied.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Return a block to the allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must have been issued by this allocator for exactly `layout`,
    /// and must not have been returned already.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

// SAFETY: forwards to `A`, which upholds the contract.
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller upholds the contract for `A`.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// The process-wide allocator, backed by [`std::alloc`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Global;

// SAFETY: `std::alloc::alloc` returns a fresh, correctly aligned block or null.
unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() != 0, "zero-sized allocation request");
        // SAFETY: layout has non-zero size (caller contract).
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError::OutOfMemory {
            size: layout.size(),
            align: layout.align(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees `ptr` came from `allocate` with `layout`.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}
