//! Test utilities and failure-injecting allocators for Hoard development.
//!
//! Provides [`FailingAllocator`], which refuses allocation requests on a
//! script while keeping a full block ledger, and small fixtures
//! ([`DropCounter`], [`ascending`]) for buffer tests and benchmarks.

#![allow(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{ascending, DropCounter, Tracked};

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use hoard_core::{AllocError, AllocStats, Allocator, CountingAllocator};

/// When a [`FailingAllocator`] refuses requests.
///
/// Requests are numbered from 1 in the order they arrive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePlan {
    /// Every request succeeds (subject to the inner allocator).
    Never,
    /// Only request number `k` fails.
    OnRequest(u64),
    /// Request number `k` and every later request fail.
    FromRequest(u64),
}

impl FailurePlan {
    fn refuses(&self, request: u64) -> bool {
        match *self {
            Self::Never => false,
            Self::OnRequest(k) => request == k,
            Self::FromRequest(k) => request >= k,
        }
    }
}

/// Allocator that fails on a script, backed by a [`CountingAllocator`].
///
/// Scripted failures never reach the inner allocator, so the ledger only
/// ever sees blocks that were really issued.
pub struct FailingAllocator {
    plan: Cell<FailurePlan>,
    seen: Cell<u64>,
    inner: CountingAllocator,
}

impl FailingAllocator {
    pub fn new(plan: FailurePlan) -> Self {
        Self {
            plan: Cell::new(plan),
            seen: Cell::new(0),
            inner: CountingAllocator::new(),
        }
    }

    /// Fail only the `k`th request.
    pub fn fail_on_request(k: u64) -> Self {
        Self::new(FailurePlan::OnRequest(k))
    }

    /// Fail the `k`th request and all that follow.
    pub fn fail_from_request(k: u64) -> Self {
        Self::new(FailurePlan::FromRequest(k))
    }

    /// Replace the plan. Request numbering continues from where it was.
    pub fn set_plan(&self, plan: FailurePlan) {
        self.plan.set(plan);
    }

    /// Number of requests received so far, including refused ones.
    pub fn requests_seen(&self) -> u64 {
        self.seen.get()
    }

    /// Counters of the backing ledger (refused requests are not included).
    pub fn stats(&self) -> AllocStats {
        self.inner.stats()
    }

    pub fn is_balanced(&self) -> bool {
        self.inner.is_balanced()
    }

    pub fn assert_balanced(&self) {
        self.inner.assert_balanced();
    }
}

// SAFETY: successful requests are served by the counting allocator.
unsafe impl Allocator for FailingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let request = self.seen.get() + 1;
        self.seen.set(request);
        if self.plan.get().refuses(request) {
            return Err(AllocError::OutOfMemory {
                size: layout.size(),
                align: layout.align(),
            });
        }
        self.inner.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller contract forwards unchanged.
        unsafe { self.inner.deallocate(ptr, layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte() -> Layout {
        Layout::new::<u8>()
    }

    #[test]
    fn fails_only_the_scripted_request() {
        let alloc = FailingAllocator::fail_on_request(2);
        let a = alloc.allocate(byte()).unwrap();
        assert!(alloc.allocate(byte()).is_err());
        let c = alloc.allocate(byte()).unwrap();
        assert_eq!(alloc.requests_seen(), 3);
        assert_eq!(alloc.stats().requests, 2);
        unsafe {
            alloc.deallocate(a, byte());
            alloc.deallocate(c, byte());
        }
        alloc.assert_balanced();
    }

    #[test]
    fn fails_from_request_onwards() {
        let alloc = FailingAllocator::fail_from_request(1);
        assert!(alloc.allocate(byte()).is_err());
        assert!(alloc.allocate(byte()).is_err());
        alloc.set_plan(FailurePlan::Never);
        let a = alloc.allocate(byte()).unwrap();
        unsafe { alloc.deallocate(a, byte()) };
        alloc.assert_balanced();
    }
}
